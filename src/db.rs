use std::{fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    auth::new_id,
    error::ApiError,
    models::{AppointmentRow, SalonRow, ServiceRow, UserRow},
};

const APPOINTMENT_SELECT: &str = r#"SELECT a.id, a.time,
           a.user_id, cu.name AS user_name, cu.email AS user_email, cu.is_barber AS user_is_barber,
           a.barber_id, b.name AS barber_name, b.email AS barber_email, b.is_barber AS barber_is_barber
      FROM appointments a
      JOIN users cu ON a.user_id = cu.id
      JOIN users b ON a.barber_id = b.id"#;

const SALON_SELECT: &str = r#"SELECT s.id, s.name, s.address, s.description, s.owner_id,
           u.name AS owner_name
      FROM salons s
      JOIN users u ON s.owner_id = u.id"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn map_unique(err: sqlx::Error, on_unique: ApiError) -> ApiError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => on_unique,
        _ => ApiError::Unavailable(err),
    }
}

pub async fn insert_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    is_barber: bool,
) -> Result<UserRow, ApiError> {
    let id = new_id();
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO users (id, name, email, password_hash, is_barber, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(is_barber)
    .bind(&created_at)
    .execute(pool)
    .await
    .map_err(|err| map_unique(err, ApiError::DuplicateEmail))?;

    Ok(UserRow {
        id,
        name: name.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        is_barber,
        created_at,
    })
}

pub async fn find_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserRow>, ApiError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, is_barber, created_at FROM users WHERE email = ? LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<UserRow>, ApiError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, is_barber, created_at FROM users WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, ApiError> {
    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password_hash, is_barber, created_at FROM users WHERE id = ? LIMIT 1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn insert_service(
    pool: &SqlitePool,
    name: &str,
    description: &str,
    price: i64,
) -> Result<ServiceRow, ApiError> {
    let id = new_id();

    sqlx::query("INSERT INTO services (id, name, description, price) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(price)
        .execute(pool)
        .await?;

    Ok(ServiceRow {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
    })
}

pub async fn list_services(pool: &SqlitePool) -> Result<Vec<ServiceRow>, ApiError> {
    let rows = sqlx::query_as::<_, ServiceRow>(
        "SELECT id, name, description, price FROM services ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn slot_taken(pool: &SqlitePool, barber_id: &str, time: &str) -> Result<bool, ApiError> {
    let existing = sqlx::query_as::<_, (String,)>(
        "SELECT id FROM appointments WHERE barber_id = ? AND time = ? LIMIT 1",
    )
    .bind(barber_id)
    .bind(time)
    .fetch_optional(pool)
    .await?;
    Ok(existing.is_some())
}

/// Inserting into the unique (barber_id, time) index is what actually holds
/// the no-double-booking invariant under concurrent requests; a violation is
/// reported as `SlotTaken`.
pub async fn insert_appointment(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    barber_id: &str,
    service_id: Option<&str>,
    time: &str,
) -> Result<(), ApiError> {
    sqlx::query(
        r#"INSERT INTO appointments (id, user_id, barber_id, service_id, time)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(id)
    .bind(user_id)
    .bind(barber_id)
    .bind(service_id)
    .bind(time)
    .execute(pool)
    .await
    .map_err(|err| map_unique(err, ApiError::SlotTaken))?;

    Ok(())
}

pub async fn fetch_appointment(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AppointmentRow>, ApiError> {
    let row = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} WHERE a.id = ? LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_appointments(pool: &SqlitePool) -> Result<Vec<AppointmentRow>, ApiError> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "{APPOINTMENT_SELECT} ORDER BY a.time"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_salon(
    pool: &SqlitePool,
    name: &str,
    address: &str,
    description: &str,
    owner_id: &str,
) -> Result<String, ApiError> {
    let id = new_id();

    sqlx::query(
        r#"INSERT INTO salons (id, name, address, description, owner_id)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(name)
    .bind(address)
    .bind(description)
    .bind(owner_id)
    .execute(pool)
    .await
    .map_err(|err| map_unique(err, ApiError::DuplicateName))?;

    Ok(id)
}

pub async fn fetch_salon(pool: &SqlitePool, id: &str) -> Result<Option<SalonRow>, ApiError> {
    let row = sqlx::query_as::<_, SalonRow>(&format!("{SALON_SELECT} WHERE s.id = ? LIMIT 1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn salon_name_exists(pool: &SqlitePool, name: &str) -> Result<bool, ApiError> {
    let existing = sqlx::query_as::<_, (String,)>("SELECT id FROM salons WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(existing.is_some())
}

pub async fn list_salons(pool: &SqlitePool) -> Result<Vec<SalonRow>, ApiError> {
    let rows = sqlx::query_as::<_, SalonRow>(&format!("{SALON_SELECT} ORDER BY s.name"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn update_salon(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    address: &str,
    description: &str,
) -> Result<(), ApiError> {
    sqlx::query("UPDATE salons SET name = ?, address = ?, description = ? WHERE id = ?")
        .bind(name)
        .bind(address)
        .bind(description)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|err| map_unique(err, ApiError::DuplicateName))?;
    Ok(())
}

pub async fn delete_salon(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM salons WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
