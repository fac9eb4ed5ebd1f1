//! Quality Model

use serde::{Deserialize, Serialize};

/// Fabric quality (面料品质 + 织厂)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Quality {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub weaver: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
}

/// Create quality payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCreate {
    pub name: String,
    #[serde(default)]
    pub weaver: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
