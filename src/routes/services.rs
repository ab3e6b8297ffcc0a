use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Deserialize;

use crate::{
    auth::current_user,
    db,
    error::ApiError,
    models::ServiceResponse,
    policy,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct ServiceCreate {
    name: String,
    description: String,
    price: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/services/")
            .route(web::post().to(add_service))
            .route(web::get().to(list_services)),
    );
}

async fn add_service(
    state: web::Data<AppState>,
    auth: BearerAuth,
    body: web::Json<ServiceCreate>,
) -> Result<HttpResponse, ApiError> {
    let actor = current_user(&state, auth.token()).await?;
    policy::can_create_service(&actor)?;

    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Service name is required.".to_string()));
    }

    let service = db::insert_service(&state.db, &body.name, &body.description, body.price).await?;
    Ok(HttpResponse::Ok().json(ServiceResponse::from(service)))
}

async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let services = db::list_services(&state.db).await?;
    let body: Vec<ServiceResponse> = services.into_iter().map(ServiceResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
