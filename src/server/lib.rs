use actix_web::{web::scope, Scope};
use web_adapters::{admin_routes, push_routes};

pub fn get_routes() -> Scope {
    scope("")
        .service(health_check)
        .configure(push_routes)
        .configure(admin_routes)
}

#[actix_web::get("/health-check")]
pub async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json("Application is safe and healthy.")
}
