//! Payment Model

use serde::{Deserialize, Serialize};

use crate::util::{new_id, now_millis};

/// Payment method (现金 / 转账)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

/// Payment record
///
/// Written exactly once per order at checkout. `paid_amount` equals the
/// order's line total at the instant of finalization and is never revised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    pub paid_amount: i64,
    pub paid_at: i64,
}

impl Payment {
    pub fn record(order_id: impl Into<String>, method: PaymentMethod, paid_amount: i64) -> Self {
        Self {
            id: new_id(),
            order_id: order_id.into(),
            method,
            paid_amount,
            paid_at: now_millis(),
        }
    }
}
