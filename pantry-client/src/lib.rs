pub mod config;
pub mod errors;
pub mod likes;
pub mod local;
pub mod models;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;
