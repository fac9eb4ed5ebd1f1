//! Order Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::IdInput;

/// Order type (染色 / 印花 / 散货)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum OrderType {
    Dying,
    Printing,
    Bulk,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dying => "Dying",
            Self::Printing => "Printing",
            Self::Bulk => "Bulk",
        }
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dying" => Ok(Self::Dying),
            "Printing" => Ok(Self::Printing),
            "Bulk" => Ok(Self::Bulk),
            other => Err(format!(
                "Invalid order type '{other}', expected one of: Dying, Printing, Bulk"
            )),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "delivered" => Ok(Self::Delivered),
            other => Err(format!(
                "Invalid status '{other}', expected one of: pending, delivered"
            )),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lab-dip sub-record carried by a line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabDip {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub shade: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sample_number: Option<String>,
    #[serde(default)]
    pub lab_send_date: Option<NaiveDate>,
    #[serde(default)]
    pub approval_date: Option<NaiveDate>,
}

/// Order line item (stored embedded in the order row as JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "_id")]
    pub id: i64,
    /// Quality reference, None for bulk items
    pub quality: Option<i64>,
    pub quantity: f64,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lab_dip: Option<LabDip>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: i64,
    /// Human-facing number: "001" for sequential orders, "BULK-…" for bulk orders
    pub order_id: String,
    pub order_type: OrderType,
    pub arrival_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub po_number: Option<String>,
    pub style_no: Option<String>,
    pub party_id: i64,
    /// Populated from the party table on reads
    #[cfg_attr(feature = "db", sqlx(default))]
    pub party_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    /// Existing item id, kept on replace so labs stay attached
    #[serde(default, rename = "_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub quality: Option<IdInput>,
    pub quantity: f64,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lab_dip: Option<LabDip>,
}

/// Create / replace order payload
///
/// `order_type` stays a raw string so an unknown value is reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_type: String,
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub style_no: Option<String>,
    pub party: IdInput,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Bulk order payload (`POST /api/orders/bulk`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOrderCreate {
    pub order_type: String,
    pub party: IdInput,
    pub quantity: f64,
}

/// Status update payload (`PATCH /api/orders/status`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    /// Opaque order id (`_id`)
    pub order_id: IdInput,
    pub status: String,
}

/// Status update result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    #[serde(rename = "_id")]
    pub id: i64,
    pub order_id: String,
    pub status: OrderStatus,
}

/// Pagination block of list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_count: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_count + limit - 1) / limit
        } else {
            0
        };
        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Paginated order list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Pagination,
}

/// Delete-all result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResult {
    pub deleted_count: u64,
}
