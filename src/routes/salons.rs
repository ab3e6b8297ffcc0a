use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde::Deserialize;

use crate::{
    auth::current_user,
    db,
    error::ApiError,
    models::SalonResponse,
    policy,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct SalonCreate {
    name: String,
    address: String,
    owner_id: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SalonUpdate {
    name: String,
    address: String,
    description: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register-salon/").route(web::post().to(register_salon)))
        .service(web::resource("/salons").route(web::get().to(list_salons)))
        .service(
            web::resource("/salons/{id}")
                .route(web::get().to(get_salon))
                .route(web::put().to(update_salon))
                .route(web::delete().to(delete_salon)),
        );
}

async fn register_salon(
    state: web::Data<AppState>,
    body: web::Json<SalonCreate>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Salon name is required.".to_string()));
    }

    if db::salon_name_exists(&state.db, &body.name).await? {
        return Err(ApiError::DuplicateName);
    }

    if db::find_user_by_id(&state.db, &body.owner_id).await?.is_none() {
        return Err(ApiError::OwnerNotFound);
    }

    let id = db::insert_salon(
        &state.db,
        &body.name,
        &body.address,
        &body.description,
        &body.owner_id,
    )
    .await?;

    let salon = db::fetch_salon(&state.db, &id)
        .await?
        .ok_or(ApiError::NotFound("Salon"))?;
    Ok(HttpResponse::Ok().json(SalonResponse::from(salon)))
}

async fn list_salons(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let salons = db::list_salons(&state.db).await?;
    let body: Vec<SalonResponse> = salons.into_iter().map(SalonResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_salon(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let salon = db::fetch_salon(&state.db, &path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Salon"))?;
    Ok(HttpResponse::Ok().json(SalonResponse::from(salon)))
}

async fn update_salon(
    state: web::Data<AppState>,
    auth: BearerAuth,
    path: web::Path<String>,
    body: web::Json<SalonUpdate>,
) -> Result<HttpResponse, ApiError> {
    let salon_id = path.into_inner();
    let actor = current_user(&state, auth.token()).await?;

    // Absence is reported before the ownership check so a missing salon is
    // distinguishable from a lack of permission.
    let salon = db::fetch_salon(&state.db, &salon_id)
        .await?
        .ok_or(ApiError::NotFound("Salon"))?;

    policy::can_update_salon(&actor, &salon)?;

    let body = body.into_inner();
    db::update_salon(&state.db, &salon_id, &body.name, &body.address, &body.description).await?;

    let updated = db::fetch_salon(&state.db, &salon_id)
        .await?
        .ok_or(ApiError::NotFound("Salon"))?;
    Ok(HttpResponse::Ok().json(SalonResponse::from(updated)))
}

async fn delete_salon(
    state: web::Data<AppState>,
    auth: BearerAuth,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let salon_id = path.into_inner();
    let actor = current_user(&state, auth.token()).await?;

    let salon = db::fetch_salon(&state.db, &salon_id)
        .await?
        .ok_or(ApiError::NotFound("Salon"))?;

    policy::can_delete_salon(&actor, &salon)?;

    db::delete_salon(&state.db, &salon_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
