//! The booking engine: the only write path for appointments.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    auth::new_id,
    db,
    error::ApiError,
    models::{AppointmentRow, UserRow},
    policy,
};

/// Booking request. `service_id` is carried through to the row without an
/// existence check, matching the current product behavior.
#[derive(Debug, Deserialize)]
pub struct AppointmentCreate {
    pub user_id: String,
    pub barber_id: String,
    pub service_id: Option<String>,
    pub time: DateTime<Utc>,
}

/// Books an appointment for `actor`.
///
/// The pre-insert conflict query gives the friendly error in the common case;
/// the unique (barber_id, time) index is what actually rules out a concurrent
/// double-booking, with its violation translated to `SlotTaken`.
pub async fn create(
    pool: &SqlitePool,
    actor: &UserRow,
    input: &AppointmentCreate,
) -> Result<AppointmentRow, ApiError> {
    policy::can_book(actor, &input.user_id)?;

    // Instants are normalized to RFC 3339 so equal times always compare equal
    // as stored strings.
    let time = input.time.to_rfc3339();

    if db::slot_taken(pool, &input.barber_id, &time).await? {
        return Err(ApiError::SlotTaken);
    }

    let id = new_id();
    db::insert_appointment(
        pool,
        &id,
        &input.user_id,
        &input.barber_id,
        input.service_id.as_deref(),
        &time,
    )
    .await?;

    db::fetch_appointment(pool, &id)
        .await?
        .ok_or(ApiError::NotFound("Appointment"))
}
