//! Data models
//!
//! Shared between fabric-server and admin clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, exposed on the wire as `_id`.

pub mod lab;
pub mod order;
pub mod party;
pub mod quality;
pub mod user;

// Re-exports
pub use lab::*;
pub use order::*;
pub use party::*;
pub use quality::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Id reference as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    /// Parse into a positive id, None if malformed
    pub fn parse(&self) -> Option<i64> {
        let id = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (id > 0).then_some(id)
    }
}

impl From<i64> for IdInput {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}
