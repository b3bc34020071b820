use actix_web::{
    delete,
    web::{Data, Json},
    HttpResponse,
};
use common::settings::types::Settings;
use db_adapters::push_subscription_adapter::PushSubscriptionAdapter;
use sea_orm::DbConn;
use types::PushUnsubscribeRequest;
use use_cases::notification::push_subscription::unsubscribe::unsubscribe_push;

use crate::utils::response_500;

#[tracing::instrument(name = "Unsubscribing push endpoint", skip(db, settings, req))]
#[delete("/subscribe")]
pub async fn unsubscribe_push_endpoint(
    db: Data<DbConn>,
    settings: Data<Settings>,
    req: Json<PushUnsubscribeRequest>,
) -> HttpResponse {
    match unsubscribe_push(
        &settings,
        req.into_inner(),
        PushSubscriptionAdapter::init(&db),
    )
    .await
    {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => response_500(e),
    }
}
