//! Pixdrop API Library
//!
//! HTTP layer of the image service: application setup, routing, handlers and the
//! conversion of domain errors into JSON responses.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
