//! OrderManager - one open order per table
//!
//! `ensure_open_order` is the find-or-create entry point every register
//! terminal goes through when a table is opened. The naive version (read
//! for an open order, insert when none is found) has a race window where
//! two concurrent callers both observe "none" and both insert. Here the
//! uniqueness check lives inside the storage write transaction
//! ([`OrderStorage::try_create_open_order`]): the loser's insert fails with
//! the winner's order id and the loop re-reads instead of retrying the
//! write.
//!
//! # Flow
//!
//! ```text
//! ensure_open_order(table_id)
//!     ├─ 1. Resolve table (NotFound if absent)
//!     ├─ 2. Read open-order index → hit: return existing order
//!     ├─ 3. Conditional create (index + order + status, one txn)
//!     ├─ 4. Lost the race → re-read, bounded retries
//!     └─ 5. Retries exhausted → ConflictRetryExhausted
//! ```

use serde::Serialize;
use shared::models::{Order, OrderLine};

use super::error::{OrderError, OrderResult};
use super::storage::{OrderStorage, StorageError};

/// Bounded retry count for the create/re-read loop. Each retry only happens
/// when another caller committed an open order between our read and our
/// insert, so convergence normally takes a single extra pass.
const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Order together with its current lines and re-derived total
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub total: i64,
}

#[derive(Clone)]
pub struct OrderManager {
    storage: OrderStorage,
}

impl OrderManager {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Return the table's current open order, creating one if none exists.
    ///
    /// Every concurrent caller for the same occupancy episode resolves to
    /// the same order id.
    pub fn ensure_open_order(&self, table_id: &str) -> OrderResult<Order> {
        let Some(table) = self.storage.get_table(table_id)? else {
            return Err(OrderError::TableNotFound(table_id.to_string()));
        };

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            if let Some(order) = self.storage.open_order_for_table(table_id)? {
                tracing::debug!(table_id, order_id = %order.id, "reusing open order");
                return Ok(order);
            }

            let order = Order::open(&table.id, &table.name);
            match self.storage.try_create_open_order(&order) {
                Ok(()) => {
                    tracing::info!(
                        table_id,
                        table_name = %table.name,
                        order_id = %order.id,
                        "opened order"
                    );
                    return Ok(order);
                }
                Err(StorageError::OpenOrderExists { order_id, .. }) => {
                    tracing::debug!(
                        table_id,
                        winner = %order_id,
                        attempt,
                        "lost open-order race, re-reading"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(OrderError::ConflictRetryExhausted(table_id.to_string()))
    }

    /// Load an order with its lines (sorted by item name) and total
    pub fn order_view(&self, order_id: &str) -> OrderResult<OrderView> {
        let Some(order) = self.storage.get_order(order_id)? else {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        };
        let mut lines = self.storage.lines_for_order(order_id)?;
        lines.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        let total = lines.iter().map(|l| l.amount).sum();
        Ok(OrderView {
            order,
            lines,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CafeTable, OrderStatus, PaymentMethod};

    fn manager() -> OrderManager {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&CafeTable::new("t-1", "a-1", "A1")).unwrap();
        OrderManager::new(storage)
    }

    #[test]
    fn creates_order_on_first_call() {
        let manager = manager();
        let order = manager.ensure_open_order("t-1").unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.table_id, "t-1");
        assert_eq!(order.table_name, "A1");
    }

    #[test]
    fn repeated_calls_return_same_order() {
        let manager = manager();
        let first = manager.ensure_open_order("t-1").unwrap();
        let second = manager.ensure_open_order("t-1").unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn unknown_table_is_not_found() {
        let manager = manager();
        assert!(matches!(
            manager.ensure_open_order("t-404"),
            Err(OrderError::TableNotFound(_))
        ));
    }

    #[test]
    fn new_order_after_checkout() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&CafeTable::new("t-1", "a-1", "A1")).unwrap();
        let manager = OrderManager::new(storage.clone());
        let book = crate::orders::lines::OrderLineBook::new(storage.clone());
        let finalizer = crate::orders::checkout::PaymentFinalizer::new(storage);

        let first = manager.ensure_open_order("t-1").unwrap();
        book.add_item(&first.id, "i-1", "Cà phê đen", 20000).unwrap();
        finalizer.finalize(&first.id, PaymentMethod::Cash).unwrap();

        // The occupancy episode ended; the next call starts a fresh order.
        let second = manager.ensure_open_order("t-1").unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.status, OrderStatus::Open);
    }

    #[test]
    fn order_view_sorts_lines_and_sums() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&CafeTable::new("t-1", "a-1", "A1")).unwrap();
        let manager = OrderManager::new(storage.clone());
        let book = crate::orders::lines::OrderLineBook::new(storage);

        let order = manager.ensure_open_order("t-1").unwrap();
        book.add_item(&order.id, "i-2", "Trà đá", 5000).unwrap();
        book.add_item(&order.id, "i-1", "Cà phê đen", 20000).unwrap();
        book.add_item(&order.id, "i-1", "Cà phê đen", 20000).unwrap();

        let view = manager.order_view(&order.id).unwrap();
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.lines[0].item_name, "Cà phê đen");
        assert_eq!(view.total, 45000);
    }
}
