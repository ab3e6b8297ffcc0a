use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_barber: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Appointment joined against both user rows, so responses never need a
/// second lookup.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub time: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_is_barber: bool,
    pub barber_id: String,
    pub barber_name: String,
    pub barber_email: String,
    pub barber_is_barber: bool,
}

/// Salon joined with its owner's display name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SalonRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: String,
    pub owner_id: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_barber: bool,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            is_barber: row.is_barber,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub time: String,
    pub user: UserResponse,
    pub barber: UserResponse,
}

impl From<AppointmentRow> for AppointmentResponse {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            time: row.time,
            user: UserResponse {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                is_barber: row.user_is_barber,
            },
            barber: UserResponse {
                id: row.barber_id,
                name: row.barber_name,
                email: row.barber_email,
                is_barber: row.barber_is_barber,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl From<ServiceRow> for ServiceResponse {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalonResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub owner: String,
    pub description: String,
}

impl From<SalonRow> for SalonResponse {
    fn from(row: SalonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            owner: row.owner_name,
            description: row.description,
        }
    }
}
