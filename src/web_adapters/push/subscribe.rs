use actix_web::{
    post,
    web::{Data, Json, ReqData},
    HttpResponse,
};
use common::settings::types::Settings;
use db_adapters::push_subscription_adapter::PushSubscriptionAdapter;
use sea_orm::DbConn;
use types::PushSubscriptionJson;
use use_cases::{notification::push_subscription::subscribe::subscribe_push, UseCaseError};

use crate::{
    middlewares::auth::AdminIdentity,
    utils::{response_400, response_500},
};

#[tracing::instrument(name = "Subscribing push endpoint", skip(db, settings, admin, req))]
#[post("/subscribe")]
pub async fn subscribe_push_endpoint(
    db: Data<DbConn>,
    settings: Data<Settings>,
    admin: Option<ReqData<AdminIdentity>>,
    req: Json<PushSubscriptionJson>,
) -> HttpResponse {
    match subscribe_push(
        admin.map(|admin| admin.admin_id),
        &settings,
        req.into_inner(),
        PushSubscriptionAdapter::init(&db),
    )
    .await
    {
        Ok(outcome) if outcome.created => HttpResponse::Created().json(outcome.subscription),
        Ok(outcome) => HttpResponse::Ok().json(outcome.subscription),
        Err(e) => match &e {
            UseCaseError::BadRequest(message) => response_400(message),
            _ => response_500(e),
        },
    }
}
