//! Order Models

use serde::{Deserialize, Serialize};

use crate::util::{new_id, now_millis};

/// Order status
///
/// `Open → Paid` is the only transition and it is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Open,
    Paid,
}

/// Order entity
///
/// `table_name` is captured at creation so history survives table renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub table_id: String,
    pub table_name: String,
    pub status: OrderStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
}

impl Order {
    /// Create a new open order for a table, snapshotting its current name.
    pub fn open(table_id: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            table_id: table_id.into(),
            table_name: table_name.into(),
            status: OrderStatus::Open,
            created_at: now_millis(),
            paid_at: None,
        }
    }
}

/// Order line entity
///
/// One line per distinct `(order_id, item_id)` pair. `amount` is always
/// `unit_price * quantity`; there is no stored override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub item_id: String,
    pub item_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub amount: i64,
}

impl OrderLine {
    /// Create a fresh line with quantity 1.
    pub fn new(
        order_id: impl Into<String>,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        unit_price: i64,
    ) -> Self {
        Self {
            id: new_id(),
            order_id: order_id.into(),
            item_id: item_id.into(),
            item_name: item_name.into(),
            unit_price,
            quantity: 1,
            amount: unit_price,
        }
    }
}
