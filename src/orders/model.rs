//! Sales order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Processing status of a sales order document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Open
    #[serde(rename = "A")]
    Open,
    /// Blocked
    #[serde(rename = "B")]
    Blocked,
    /// Completed
    #[serde(rename = "C")]
    Completed,
}

/// A sales order header with its items, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub sales_order_number: String,
    /// e.g. `OR` (standard order) or `RE` (returns)
    pub document_type: String,
    pub sales_organization: String,
    pub distribution_channel: String,
    pub division: String,
    pub customer_code: String,
    pub customer_name: String,
    pub order_date: DateTime<Utc>,
    pub requested_delivery_date: DateTime<Utc>,
    pub purchase_order_number: Option<String>,
    pub currency: String,
    /// Sum of the item totals
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<SalesOrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single line of a sales order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    /// Six-digit position number: `000010`, `000020`, ...
    pub item_number: String,
    pub material_code: String,
    pub material_description: String,
    pub quantity: Decimal,
    pub unit_of_measure: String,
    pub unit_price: Decimal,
    /// `quantity * unit_price`
    pub total_price: Decimal,
    pub plant: String,
    pub storage_location: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// A validated order that has not been numbered or priced yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalesOrder {
    pub document_type: String,
    pub sales_organization: String,
    pub distribution_channel: String,
    pub division: String,
    pub customer_code: String,
    pub requested_delivery_date: DateTime<Utc>,
    pub purchase_order_number: Option<String>,
    pub currency: String,
    pub items: Vec<NewSalesOrderItem>,
}

/// A validated order line that has not been priced yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSalesOrderItem {
    pub material_code: String,
    pub quantity: Decimal,
    pub unit_of_measure: String,
    pub plant: String,
    pub storage_location: Option<String>,
    pub batch_number: Option<String>,
}
