pub mod auth;
pub mod booking;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod policy;
pub mod routes;
pub mod state;

pub use routes::configure;
