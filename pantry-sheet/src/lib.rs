pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod routes;

pub use routes::{router, AppState};
