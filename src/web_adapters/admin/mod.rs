mod events;

use actix_web::web::{scope, ServiceConfig};

pub fn admin_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/admin")
            .service(push_test::send_test_push_endpoint)
            .service(events::stream_events_endpoint),
    );
}
