use actix_web::{web, HttpResponse};
use chrono::Duration;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{authenticate_credentials, hash_password, issue_token},
    db,
    error::ApiError,
    models::UserResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct UserCreate {
    name: String,
    email: String,
    password: String,
    is_barber: bool,
}

#[derive(Debug, Deserialize)]
struct TokenForm {
    username: String,
    password: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register/").route(web::post().to(register_user)))
        .service(web::resource("/token").route(web::post().to(login_for_access_token)));
}

async fn register_user(
    state: web::Data<AppState>,
    body: web::Json<UserCreate>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required.".to_string()));
    }
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required.".to_string()));
    }
    if body.password.is_empty() {
        return Err(ApiError::Validation("Password is required.".to_string()));
    }

    if db::find_user_by_email(&state.db, &body.email).await?.is_some() {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_password(&body.password).map_err(|err| {
        log::error!("Password hash failed: {err}");
        ApiError::Internal
    })?;

    let user = db::insert_user(&state.db, &body.name, &body.email, &password_hash, body.is_barber)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn login_for_access_token(
    state: web::Data<AppState>,
    form: web::Form<TokenForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();

    let user = authenticate_credentials(&state.db, &form.username, &form.password)
        .await?
        .ok_or(ApiError::BadCredentials)?;

    let token = issue_token(
        &state.config.secret_key,
        &user.email,
        Duration::minutes(state.config.token_ttl_minutes),
    )
    .map_err(|err| {
        log::error!("Token signing failed: {err}");
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "access_token": token,
        "token_type": "bearer",
    })))
}
