use actix_web::{get, web::Data, HttpResponse};
use common::settings::types::Settings;
use use_cases::notification::public_key::get_public_key;

use crate::utils::response_500;

#[tracing::instrument(name = "Getting VAPID public key", skip(settings))]
#[get("/public-key")]
pub async fn get_public_key_endpoint(settings: Data<Settings>) -> HttpResponse {
    match get_public_key(&settings) {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(e) => response_500(e),
    }
}
