//! OrderLineBook - line items of an order
//!
//! Repeated additions of the same item merge into a quantity increment
//! instead of duplicate rows; a quantity change that reaches zero deletes
//! the line. Both mutations run inside a single write transaction keyed
//! through the `(order_id, item_id)` merge index, so two concurrent "add
//! same item" taps can never produce two quantity-1 lines.
//!
//! Totals are re-derived from the current lines on every read. There is no
//! cached running total anywhere that could drift out of sync with line
//! edits.

use shared::models::{OrderLine, OrderStatus};

use super::error::{OrderError, OrderResult};
use super::money;
use super::storage::OrderStorage;

/// Outcome of a quantity change
#[derive(Debug, Clone)]
pub enum QuantityChange {
    /// Line updated to a new quantity
    Updated(OrderLine),
    /// Quantity dropped to zero or below; line deleted
    Removed(OrderLine),
    /// Line no longer exists (deleted by a concurrent change); benign
    AlreadyGone,
}

#[derive(Clone)]
pub struct OrderLineBook {
    storage: OrderStorage,
}

impl OrderLineBook {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Add one unit of an item to an order
    ///
    /// Upsert-increment: an existing `(order, item)` line gains quantity 1
    /// and a recomputed amount; otherwise a fresh quantity-1 line is
    /// inserted. The existing line keeps its own unit price: a later
    /// catalog price change never rewrites lines already on the order.
    pub fn add_item(
        &self,
        order_id: &str,
        item_id: &str,
        item_name: &str,
        unit_price: i64,
    ) -> OrderResult<OrderLine> {
        money::validate_item(item_name, unit_price)?;

        let txn = self.storage.begin_write()?;
        let Some(order) = self.storage.get_order_txn(&txn, order_id)? else {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        };
        if order.status == OrderStatus::Paid {
            return Err(OrderError::AlreadyPaid(order_id.to_string()));
        }

        let line = match self.storage.find_line_by_item_txn(&txn, order_id, item_id)? {
            Some(mut line) => {
                money::validate_quantity(line.quantity + 1)?;
                line.quantity += 1;
                line.amount = money::line_amount(line.unit_price, line.quantity);
                self.storage.put_line_txn(&txn, &line)?;
                line
            }
            None => {
                let line = OrderLine::new(order_id, item_id, item_name, unit_price);
                self.storage.put_line_txn(&txn, &line)?;
                line
            }
        };
        txn.commit()?;

        tracing::info!(
            order_id,
            item_id,
            quantity = line.quantity,
            amount = line.amount,
            "item added"
        );
        Ok(line)
    }

    /// Apply a quantity delta to a line
    ///
    /// Observed usage is ±1 but any integer delta is accepted. A resulting
    /// quantity ≤ 0 deletes the line. A missing line (already deleted by a
    /// concurrent decrement) is reported as [`QuantityChange::AlreadyGone`],
    /// which callers treat as "nothing to do", not as an error.
    pub fn change_quantity(&self, line_id: &str, delta: i32) -> OrderResult<QuantityChange> {
        let txn = self.storage.begin_write()?;
        let Some(mut line) = self.storage.get_line_txn(&txn, line_id)? else {
            tracing::debug!(line_id, "quantity change on missing line, nothing to do");
            return Ok(QuantityChange::AlreadyGone);
        };
        let Some(order) = self.storage.get_order_txn(&txn, &line.order_id)? else {
            return Err(OrderError::OrderNotFound(line.order_id.clone()));
        };
        if order.status == OrderStatus::Paid {
            return Err(OrderError::AlreadyPaid(order.id));
        }

        let new_quantity = line.quantity.saturating_add(delta);
        let outcome = if new_quantity <= 0 {
            self.storage.delete_line_txn(&txn, &line)?;
            QuantityChange::Removed(line)
        } else {
            money::validate_quantity(new_quantity)?;
            line.quantity = new_quantity;
            line.amount = money::line_amount(line.unit_price, line.quantity);
            self.storage.put_line_txn(&txn, &line)?;
            QuantityChange::Updated(line)
        };
        txn.commit()?;

        match &outcome {
            QuantityChange::Updated(line) => {
                tracing::info!(line_id, quantity = line.quantity, "quantity changed");
            }
            QuantityChange::Removed(line) => {
                tracing::info!(line_id, item_id = %line.item_id, "line removed");
            }
            QuantityChange::AlreadyGone => {}
        }
        Ok(outcome)
    }

    /// Current lines of an order, sorted by item name
    pub fn lines(&self, order_id: &str) -> OrderResult<Vec<OrderLine>> {
        let mut lines = self.storage.lines_for_order(order_id)?;
        lines.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(lines)
    }

    /// Order total, re-derived from the current lines
    pub fn total(&self, order_id: &str) -> OrderResult<i64> {
        if self.storage.get_order(order_id)?.is_none() {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        }
        let lines = self.storage.lines_for_order(order_id)?;
        Ok(lines.iter().map(|l| l.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::manager::OrderManager;
    use shared::models::CafeTable;

    fn setup() -> (OrderLineBook, String) {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&CafeTable::new("t-1", "a-1", "A1")).unwrap();
        let order = OrderManager::new(storage.clone())
            .ensure_open_order("t-1")
            .unwrap();
        (OrderLineBook::new(storage), order.id)
    }

    #[test]
    fn repeat_additions_merge_into_one_line() {
        let (book, order_id) = setup();

        let first = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();
        let second = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 2);
        assert_eq!(second.amount, 40000);
        assert_eq!(book.lines(&order_id).unwrap().len(), 1);
    }

    #[test]
    fn distinct_items_get_distinct_lines() {
        let (book, order_id) = setup();
        book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();
        book.add_item(&order_id, "i-2", "Trà đá", 5000).unwrap();

        assert_eq!(book.lines(&order_id).unwrap().len(), 2);
        assert_eq!(book.total(&order_id).unwrap(), 25000);
    }

    #[test]
    fn decrement_to_zero_deletes_line() {
        let (book, order_id) = setup();
        let line = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();

        match book.change_quantity(&line.id, -1).unwrap() {
            QuantityChange::Removed(removed) => assert_eq!(removed.id, line.id),
            other => panic!("expected Removed, got {other:?}"),
        }
        assert!(book.lines(&order_id).unwrap().is_empty());

        // The line is gone; a racing decrement resolves to a no-op.
        assert!(matches!(
            book.change_quantity(&line.id, -1).unwrap(),
            QuantityChange::AlreadyGone
        ));
    }

    #[test]
    fn increment_recomputes_amount() {
        let (book, order_id) = setup();
        let line = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();

        match book.change_quantity(&line.id, 1).unwrap() {
            QuantityChange::Updated(updated) => {
                assert_eq!(updated.quantity, 2);
                assert_eq!(updated.amount, 40000);
            }
            other => panic!("expected Updated, got {other:?}"),
        }
    }

    #[test]
    fn larger_negative_delta_deletes() {
        let (book, order_id) = setup();
        let line = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();
        book.change_quantity(&line.id, 1).unwrap();

        assert!(matches!(
            book.change_quantity(&line.id, -5).unwrap(),
            QuantityChange::Removed(_)
        ));
        assert_eq!(book.total(&order_id).unwrap(), 0);
    }

    #[test]
    fn rejects_invalid_items() {
        let (book, order_id) = setup();
        assert!(matches!(
            book.add_item(&order_id, "i-1", "", 20000),
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            book.add_item(&order_id, "i-1", "Cà phê đen", 0),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn rejects_unknown_order() {
        let (book, _) = setup();
        assert!(matches!(
            book.add_item("o-404", "i-1", "Cà phê đen", 20000),
            Err(OrderError::OrderNotFound(_))
        ));
        assert!(matches!(
            book.total("o-404"),
            Err(OrderError::OrderNotFound(_))
        ));
    }

    #[test]
    fn total_tracks_any_edit_sequence() {
        let (book, order_id) = setup();
        let coffee = book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();
        book.add_item(&order_id, "i-1", "Cà phê đen", 20000).unwrap();
        book.add_item(&order_id, "i-2", "Bạc xỉu", 30000).unwrap();
        book.change_quantity(&coffee.id, -1).unwrap();

        let lines = book.lines(&order_id).unwrap();
        let derived: i64 = lines.iter().map(|l| l.amount).sum();
        assert_eq!(book.total(&order_id).unwrap(), derived);
        assert_eq!(derived, 50000);
    }
}
