use sea_orm_migration::{prelude::*, schema::*};

const PUSH_SUBSCRIPTION_OWNER_ID_INDEX_NAME: &str = "push_subscription_owner_id_index";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PushSubscription::Table)
                    .if_not_exists()
                    .col(uuid(PushSubscription::Id).primary_key())
                    .col(string_uniq(PushSubscription::EndpointDigest))
                    .col(string(PushSubscription::Endpoint))
                    .col(string(PushSubscription::P256dhKey))
                    .col(string(PushSubscription::AuthKey))
                    .col(uuid_null(PushSubscription::OwnerId))
                    .col(big_integer_null(PushSubscription::ExpirationEpochTime))
                    .col(
                        timestamp_with_time_zone(PushSubscription::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(PushSubscription::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(PUSH_SUBSCRIPTION_OWNER_ID_INDEX_NAME)
                    .table(PushSubscription::Table)
                    .col(PushSubscription::OwnerId)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(PUSH_SUBSCRIPTION_OWNER_ID_INDEX_NAME)
                    .table(PushSubscription::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PushSubscription::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum PushSubscription {
    Table,
    Id,
    EndpointDigest,
    Endpoint,
    P256dhKey,
    AuthKey,
    OwnerId,
    ExpirationEpochTime,
    CreatedAt,
    UpdatedAt,
}
