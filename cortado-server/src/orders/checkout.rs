//! PaymentFinalizer - atomic checkout
//!
//! Finalizing an order records the payment, closes the order and frees the
//! table in one write transaction. Either every step commits or none does:
//! a failed checkout leaves the order `Open` and the table `InUse`, so the
//! operation is safely retryable.
//!
//! The `Open → Paid` transition is the serialization point for concurrent
//! finalize calls (a double-tapped checkout button): the transaction that
//! commits first wins, every later one reads `Paid` and fails with
//! `AlreadyPaid` instead of recording a second payment.

use shared::models::{OrderStatus, Payment, PaymentMethod, TableStatus};

use super::error::{OrderError, OrderResult};
use super::storage::OrderStorage;

#[derive(Clone)]
pub struct PaymentFinalizer {
    storage: OrderStorage,
}

impl PaymentFinalizer {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Record a payment for the order's current total, close the order and
    /// free its table.
    pub fn finalize(&self, order_id: &str, method: PaymentMethod) -> OrderResult<Payment> {
        let txn = self.storage.begin_write()?;

        let Some(mut order) = self.storage.get_order_txn(&txn, order_id)? else {
            return Err(OrderError::OrderNotFound(order_id.to_string()));
        };
        if order.status == OrderStatus::Paid {
            return Err(OrderError::AlreadyPaid(order_id.to_string()));
        }

        let lines = self.storage.lines_for_order_txn(&txn, order_id)?;
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder(order_id.to_string()));
        }
        let total: i64 = lines.iter().map(|l| l.amount).sum();

        let payment = Payment::record(order_id, method, total);
        self.storage.insert_payment_txn(&txn, &payment)?;

        order.status = OrderStatus::Paid;
        order.paid_at = Some(payment.paid_at);
        self.storage.put_order_txn(&txn, &order)?;

        self.storage.remove_open_order_txn(&txn, &order.table_id)?;
        self.storage
            .update_table_status_txn(&txn, &order.table_id, TableStatus::Empty)?;

        txn.commit()?;

        tracing::info!(
            order_id,
            table_id = %order.table_id,
            method = ?method,
            paid_amount = payment.paid_amount,
            "order finalized, table freed"
        );
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::lines::OrderLineBook;
    use crate::orders::manager::OrderManager;
    use shared::models::CafeTable;

    struct Fixture {
        storage: OrderStorage,
        finalizer: PaymentFinalizer,
        book: OrderLineBook,
        order_id: String,
    }

    fn setup() -> Fixture {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&CafeTable::new("t-1", "a-1", "A1")).unwrap();
        let order = OrderManager::new(storage.clone())
            .ensure_open_order("t-1")
            .unwrap();
        Fixture {
            finalizer: PaymentFinalizer::new(storage.clone()),
            book: OrderLineBook::new(storage.clone()),
            storage,
            order_id: order.id,
        }
    }

    #[test]
    fn finalize_records_payment_and_frees_table() {
        let f = setup();
        f.book.add_item(&f.order_id, "i-1", "Cà phê đen", 20000).unwrap();
        f.book.add_item(&f.order_id, "i-1", "Cà phê đen", 20000).unwrap();

        let payment = f.finalizer.finalize(&f.order_id, PaymentMethod::Cash).unwrap();
        assert_eq!(payment.paid_amount, 40000);
        assert_eq!(payment.method, PaymentMethod::Cash);

        let order = f.storage.get_order(&f.order_id).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.paid_at, Some(payment.paid_at));

        let table = f.storage.get_table("t-1").unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Empty);
        assert!(f.storage.open_order_for_table("t-1").unwrap().is_none());
    }

    #[test]
    fn empty_order_cannot_be_finalized() {
        let f = setup();
        assert!(matches!(
            f.finalizer.finalize(&f.order_id, PaymentMethod::Cash),
            Err(OrderError::EmptyOrder(_))
        ));

        // Nothing was applied: order still open, table still occupied.
        let order = f.storage.get_order(&f.order_id).unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(
            f.storage.get_table("t-1").unwrap().unwrap().status,
            TableStatus::InUse
        );
    }

    #[test]
    fn second_finalize_fails_with_already_paid() {
        let f = setup();
        f.book.add_item(&f.order_id, "i-1", "Cà phê đen", 20000).unwrap();

        f.finalizer.finalize(&f.order_id, PaymentMethod::Transfer).unwrap();
        assert!(matches!(
            f.finalizer.finalize(&f.order_id, PaymentMethod::Cash),
            Err(OrderError::AlreadyPaid(_))
        ));

        // Exactly one payment record exists.
        let payment = f.storage.payment_for_order(&f.order_id).unwrap().unwrap();
        assert_eq!(payment.method, PaymentMethod::Transfer);
    }

    #[test]
    fn paid_amount_matches_total_at_finalize_time() {
        let f = setup();
        let line = f.book.add_item(&f.order_id, "i-1", "Cà phê đen", 20000).unwrap();
        f.book.add_item(&f.order_id, "i-2", "Bạc xỉu", 30000).unwrap();
        f.book.change_quantity(&line.id, 1).unwrap();

        let total = f.book.total(&f.order_id).unwrap();
        let payment = f.finalizer.finalize(&f.order_id, PaymentMethod::Cash).unwrap();
        assert_eq!(payment.paid_amount, total);
        assert_eq!(payment.paid_amount, 70000);
    }

    #[test]
    fn unknown_order_is_not_found() {
        let f = setup();
        assert!(matches!(
            f.finalizer.finalize("o-404", PaymentMethod::Cash),
            Err(OrderError::OrderNotFound(_))
        ));
    }

    #[test]
    fn lines_are_frozen_after_finalize() {
        let f = setup();
        let line = f.book.add_item(&f.order_id, "i-1", "Cà phê đen", 20000).unwrap();
        f.finalizer.finalize(&f.order_id, PaymentMethod::Cash).unwrap();

        assert!(matches!(
            f.book.add_item(&f.order_id, "i-2", "Trà đá", 5000),
            Err(OrderError::AlreadyPaid(_))
        ));
        assert!(matches!(
            f.book.change_quantity(&line.id, 1),
            Err(OrderError::AlreadyPaid(_))
        ));
    }
}
