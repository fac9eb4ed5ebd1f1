//! Shared types for the fabric order desk
//!
//! Wire/domain models, the unified error system and small utilities used by
//! the server and admin clients.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
