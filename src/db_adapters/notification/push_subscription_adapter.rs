use std::future::Future;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, IntoActiveModel, ModelTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, Select, Set, SqlErr,
};
use uuid::Uuid;

use entities::push_subscription::{ActiveModel, Column, Entity, Model};

#[derive(Clone)]
pub struct PushSubscriptionAdapter<'a> {
    pub db: &'a DbConn,
    pub query: Select<Entity>,
}

impl<'a> PushSubscriptionAdapter<'a> {
    pub fn init(db: &'a DbConn) -> Self {
        Self {
            db,
            query: Entity::find(),
        }
    }
}

pub trait PushSubscriptionFilter {
    fn filter_eq_owner_id(self, owner_id: Uuid) -> Self;
    fn filter_eq_endpoint_digest(self, endpoint_digest: &str) -> Self;
}

impl PushSubscriptionFilter for PushSubscriptionAdapter<'_> {
    fn filter_eq_owner_id(mut self, owner_id: Uuid) -> Self {
        self.query = self.query.filter(Column::OwnerId.eq(owner_id));
        self
    }

    fn filter_eq_endpoint_digest(mut self, endpoint_digest: &str) -> Self {
        self.query = self
            .query
            .filter(Column::EndpointDigest.eq(endpoint_digest));
        self
    }
}

pub trait PushSubscriptionOrder {
    fn order_by_created_at(self, order: Order) -> Self;
}

impl PushSubscriptionOrder for PushSubscriptionAdapter<'_> {
    fn order_by_created_at(mut self, order: Order) -> Self {
        self.query = self.query.order_by(Column::CreatedAt, order);
        self
    }
}

pub trait PushSubscriptionQuery {
    fn get_one(self) -> impl Future<Output = Result<Option<Model>, DbErr>>;
    fn get_all(self) -> impl Future<Output = Result<Vec<Model>, DbErr>>;
    fn count(self) -> impl Future<Output = Result<u64, DbErr>>;
}

impl PushSubscriptionQuery for PushSubscriptionAdapter<'_> {
    async fn get_one(self) -> Result<Option<Model>, DbErr> {
        self.query.one(self.db).await
    }

    async fn get_all(self) -> Result<Vec<Model>, DbErr> {
        self.query.all(self.db).await
    }

    async fn count(self) -> Result<u64, DbErr> {
        self.query.count(self.db).await
    }
}

#[derive(Debug, Clone)]
pub struct UpsertPushSubscriptionParams {
    pub endpoint_digest: String,
    pub endpoint: String,
    pub p256dh_key: String,
    pub auth_key: String,
    pub owner_id: Option<Uuid>,
    pub expiration_epoch_time: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UpsertOutcome {
    Created(Model),
    Updated(Model),
}

impl UpsertOutcome {
    pub fn model(&self) -> &Model {
        match self {
            UpsertOutcome::Created(model) | UpsertOutcome::Updated(model) => model,
        }
    }
}

pub trait PushSubscriptionMutation {
    fn upsert(
        self,
        params: UpsertPushSubscriptionParams,
    ) -> impl Future<Output = Result<UpsertOutcome, DbErr>>;
    fn delete(self, push_subscription: Model) -> impl Future<Output = Result<(), DbErr>>;
    fn delete_by_endpoint_digest(
        self,
        endpoint_digest: &str,
    ) -> impl Future<Output = Result<u64, DbErr>>;
}

impl PushSubscriptionMutation for PushSubscriptionAdapter<'_> {
    async fn upsert(self, params: UpsertPushSubscriptionParams) -> Result<UpsertOutcome, DbErr> {
        if let Some(existing) = self.find_by_digest(&params.endpoint_digest).await? {
            return self.update(existing, params).await;
        }

        let now = Utc::now();
        let inserted = ActiveModel {
            id: Set(Uuid::now_v7()),
            endpoint_digest: Set(params.endpoint_digest.clone()),
            endpoint: Set(params.endpoint.clone()),
            p256dh_key: Set(params.p256dh_key.clone()),
            auth_key: Set(params.auth_key.clone()),
            owner_id: Set(params.owner_id),
            expiration_epoch_time: Set(params.expiration_epoch_time),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(self.db)
        .await;

        match inserted {
            Ok(model) => Ok(UpsertOutcome::Created(model)),
            // A concurrent subscribe for the same endpoint won the insert.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                match self.find_by_digest(&params.endpoint_digest).await? {
                    Some(existing) => self.update(existing, params).await,
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn delete(self, push_subscription: Model) -> Result<(), DbErr> {
        push_subscription.delete(self.db).await.map(|_| ())
    }

    async fn delete_by_endpoint_digest(self, endpoint_digest: &str) -> Result<u64, DbErr> {
        Entity::delete_many()
            .filter(Column::EndpointDigest.eq(endpoint_digest))
            .exec(self.db)
            .await
            .map(|res| res.rows_affected)
    }
}

impl PushSubscriptionAdapter<'_> {
    async fn find_by_digest(&self, endpoint_digest: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::EndpointDigest.eq(endpoint_digest))
            .one(self.db)
            .await
    }

    async fn update(
        &self,
        existing: Model,
        params: UpsertPushSubscriptionParams,
    ) -> Result<UpsertOutcome, DbErr> {
        let owner_id = params.owner_id.or(existing.owner_id);
        let mut push_subscription = existing.into_active_model();
        push_subscription.endpoint = Set(params.endpoint);
        push_subscription.p256dh_key = Set(params.p256dh_key);
        push_subscription.auth_key = Set(params.auth_key);
        push_subscription.owner_id = Set(owner_id);
        push_subscription.expiration_epoch_time = Set(params.expiration_epoch_time);
        push_subscription.updated_at = Set(Utc::now().into());
        push_subscription
            .update(self.db)
            .await
            .map(UpsertOutcome::Updated)
    }
}
