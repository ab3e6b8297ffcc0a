use std::env;

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Process-wide configuration, read from the environment once at startup and
/// immutable afterwards.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub secret_key: String,
    pub token_ttl_minutes: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/barberbook.db".to_string());

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            log::warn!("SECRET_KEY not set. Using an insecure default. Set SECRET_KEY in production.");
            "insecure-dev-secret".to_string()
        });

        let token_ttl_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);

        Self {
            database_url,
            secret_key,
            token_ttl_minutes,
            port,
        }
    }
}
