//! History service - read-only reporting over past payments
//!
//! History reads the records the lifecycle core produced; it never mutates
//! them. A payment row carries the order's table-name snapshot so the view
//! survives table renames and deletions.

use serde::Serialize;
use shared::models::{Order, OrderLine, Payment};

use crate::orders::error::{OrderError, OrderResult};
use crate::orders::storage::{OrderStorage, StorageResult};

/// Payment joined with its order's table-name snapshot
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub payment: Payment,
    pub table_name: String,
}

/// Payments in a date range, newest first, with the revenue sum
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    pub payments: Vec<HistoryEntry>,
    pub revenue: i64,
}

/// A paid order with its frozen lines and payment record
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

#[derive(Clone)]
pub struct HistoryService {
    storage: OrderStorage,
}

impl HistoryService {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Payments with `from <= paid_at < to` (epoch millis), newest first
    pub fn payments_between(&self, from: i64, to: i64) -> StorageResult<HistoryPage> {
        let mut payments = self.storage.payments_between(from, to)?;
        payments.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));

        let revenue = payments.iter().map(|p| p.paid_amount).sum();
        let mut entries = Vec::with_capacity(payments.len());
        for payment in payments {
            let table_name = self
                .storage
                .get_order(&payment.order_id)?
                .map(|o| o.table_name)
                .unwrap_or_default();
            entries.push(HistoryEntry {
                payment,
                table_name,
            });
        }
        Ok(HistoryPage {
            payments: entries,
            revenue,
        })
    }

    /// Full detail of one order (open or paid)
    pub fn order_detail(&self, order_id: &str) -> OrderResult<OrderDetail> {
        let Some(order) = self.storage.get_order(order_id)? else {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        };
        let mut lines = self.storage.lines_for_order(order_id)?;
        lines.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        let total = lines.iter().map(|l| l.amount).sum();
        let payment = self.storage.payment_for_order(order_id)?;
        Ok(OrderDetail {
            order,
            lines,
            total,
            payment,
        })
    }
}
