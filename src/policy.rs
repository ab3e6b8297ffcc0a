//! Authorization rules as pure predicates over (actor, resource). No store
//! access happens here; callers fetch whatever the rule needs first.

use crate::{
    error::ApiError,
    models::{SalonRow, UserRow},
};

/// A user may only book for themselves.
pub fn can_book(actor: &UserRow, booking_user_id: &str) -> Result<(), ApiError> {
    if actor.id != booking_user_id {
        return Err(ApiError::Forbidden("Not authorized to book this appointment"));
    }
    Ok(())
}

pub fn can_create_service(actor: &UserRow) -> Result<(), ApiError> {
    if !actor.is_barber {
        return Err(ApiError::Forbidden("Only barbers can add services."));
    }
    Ok(())
}

pub fn can_update_salon(actor: &UserRow, salon: &SalonRow) -> Result<(), ApiError> {
    if salon.owner_id != actor.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to update this salon",
        ));
    }
    Ok(())
}

pub fn can_delete_salon(actor: &UserRow, salon: &SalonRow) -> Result<(), ApiError> {
    if salon.owner_id != actor.id {
        return Err(ApiError::Forbidden(
            "You don't have permission to delete this salon",
        ));
    }
    Ok(())
}
