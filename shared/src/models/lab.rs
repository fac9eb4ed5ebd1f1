//! Lab Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::IdInput;

/// Lab-dip status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LabStatus {
    #[default]
    Sent,
    Received,
    Approved,
    Rejected,
}

impl FromStr for LabStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "received" => Ok(Self::Received),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!(
                "Invalid lab status '{other}', expected one of: sent, received, approved, rejected"
            )),
        }
    }
}

/// Lab record, subordinate to an order (soft reference, no FK)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Lab {
    #[serde(rename = "_id")]
    pub id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    pub status: LabStatus,
    pub lab_send_date: Option<NaiveDate>,
    pub lab_send_number: Option<String>,
    pub remarks: Option<String>,
    pub soft_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create lab payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabCreate {
    pub order_id: IdInput,
    pub order_item_id: IdInput,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lab_send_date: Option<NaiveDate>,
    #[serde(default)]
    pub lab_send_number: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}
