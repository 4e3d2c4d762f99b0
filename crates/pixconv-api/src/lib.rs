//! Pixconv API Library
//!
//! HTTP endpoint that receives converted images, re-validates them and stores
//! them on local disk.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
