//! View models behind the application's entry points.
//!
//! Fetch failures are logged and degrade to an empty or unchanged view; they never
//! reach the caller as errors.
pub mod admin;
pub mod detail;
pub mod list;

pub use admin::{AdminView, DeleteOutcome, FormMode, SubmitOutcome};
pub use detail::{DetailState, DetailView, LikeOutcome};
pub use list::{ListState, ListView, PAGE_SIZE};
