use actix_web::{web, HttpResponse};

pub mod appointments;
pub mod salons;
pub mod services;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    users::configure(cfg);
    appointments::configure(cfg);
    services::configure(cfg);
    salons::configure(cfg);
    cfg.service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}
