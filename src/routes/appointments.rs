use actix_web::{web, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    auth::current_user,
    booking::{self, AppointmentCreate},
    db,
    error::ApiError,
    models::AppointmentResponse,
    state::AppState,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/appointments")
            .route(web::post().to(create_appointment))
            .route(web::get().to(list_appointments)),
    )
    .service(web::resource("/appointments/{id}").route(web::get().to(get_appointment)));
}

async fn create_appointment(
    state: web::Data<AppState>,
    auth: BearerAuth,
    body: web::Json<AppointmentCreate>,
) -> Result<HttpResponse, ApiError> {
    let actor = current_user(&state, auth.token()).await?;
    let appointment = booking::create(&state.db, &actor, &body).await?;
    Ok(HttpResponse::Ok().json(AppointmentResponse::from(appointment)))
}

async fn get_appointment(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let appointment = db::fetch_appointment(&state.db, &path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Appointment"))?;
    Ok(HttpResponse::Ok().json(AppointmentResponse::from(appointment)))
}

async fn list_appointments(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let appointments = db::list_appointments(&state.db).await?;
    let body: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}
