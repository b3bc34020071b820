mod public_key;
mod subscribe;
mod unsubscribe;

use actix_web::web::{scope, ServiceConfig};

pub fn push_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/push")
            .service(public_key::get_public_key_endpoint)
            .service(subscribe::subscribe_push_endpoint)
            .service(unsubscribe::unsubscribe_push_endpoint),
    );
}
