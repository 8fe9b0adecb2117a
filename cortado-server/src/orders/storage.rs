//! redb-based storage layer for the order/table lifecycle
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `areas` | `area_id` | `Area` | Floor areas |
//! | `cafe_tables` | `table_id` | `CafeTable` | Tables + occupancy status |
//! | `menu_groups` | `group_id` | `MenuGroup` | Menu groups |
//! | `menu_items` | `item_id` | `MenuItem` | Sellable items |
//! | `orders` | `order_id` | `Order` | Orders (open and paid) |
//! | `open_orders` | `table_id` | `order_id` | Open-order index (uniqueness) |
//! | `order_lines` | `line_id` | `OrderLine` | Line items |
//! | `line_index` | `(order_id, item_id)` | `line_id` | Line merge index (uniqueness) |
//! | `payments` | `payment_id` | `Payment` | Immutable payment records |
//!
//! # Invariant enforcement
//!
//! The `open_orders` and `line_index` tables are the write-time uniqueness
//! constraints: "at most one open order per table" and "one line per
//! `(order, item)`". Both are checked and written inside a single write
//! transaction, so a concurrent attempt either sees the committed entry or
//! fails the conditional insert; there is no read-then-write window.
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: copy-on-write with
//! an atomic root pointer swap, so the database file is always in a
//! consistent state even across power loss. This matters for register
//! terminals that get switched off at closing time.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{Area, CafeTable, MenuGroup, MenuItem, Order, OrderLine, Payment, TableStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Floor areas: key = area_id, value = JSON-serialized Area
const AREAS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("areas");

/// Tables: key = table_id, value = JSON-serialized CafeTable
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cafe_tables");

/// Menu groups: key = group_id, value = JSON-serialized MenuGroup
const MENU_GROUPS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_groups");

/// Menu items: key = item_id, value = JSON-serialized MenuItem
const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

/// Orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Open-order index: key = table_id, value = order_id (existence = occupied)
const OPEN_ORDERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("open_orders");

/// Order lines: key = line_id, value = JSON-serialized OrderLine
const ORDER_LINES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("order_lines");

/// Line merge index: key = (order_id, item_id), value = line_id
const LINE_INDEX_TABLE: TableDefinition<(&str, &str), &str> = TableDefinition::new("line_index");

/// Payments: key = payment_id, value = JSON-serialized Payment
const PAYMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Conditional open-order insert lost the race; carries the winner's id
    /// so the caller can re-read instead of blindly retrying the write.
    #[error("Table {table_id} already has open order {order_id}")]
    OpenOrderExists { table_id: String, order_id: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order storage backed by redb
///
/// redb is single-writer: every write transaction is serialized and
/// serializable, which is exactly the mutual-exclusion scope the lifecycle
/// invariants need. Reads run on immutable snapshots and never block writes.
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables so later read transactions never hit a missing table
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(AREAS_TABLE)?;
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(MENU_GROUPS_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_LINES_TABLE)?;
            let _ = write_txn.open_table(LINE_INDEX_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Provisioning / Seeding ==========
    // Table, area and menu CRUD is not part of the lifecycle core; these
    // writes exist for bootstrap seeding and tests.

    pub fn put_area(&self, area: &Area) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(AREAS_TABLE)?;
            table.insert(area.id.as_str(), serde_json::to_vec(area)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn put_table(&self, cafe_table: &CafeTable) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TABLES_TABLE)?;
            table.insert(
                cafe_table.id.as_str(),
                serde_json::to_vec(cafe_table)?.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn put_menu_group(&self, group: &MenuGroup) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_GROUPS_TABLE)?;
            table.insert(group.id.as_str(), serde_json::to_vec(group)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn put_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(MENU_ITEMS_TABLE)?;
            table.insert(item.id.as_str(), serde_json::to_vec(item)?.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Read Operations ==========

    pub fn list_areas(&self) -> StorageResult<Vec<Area>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(AREAS_TABLE)?;
        let mut areas = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            areas.push(serde_json::from_slice(value.value())?);
        }
        Ok(areas)
    }

    /// List tables, optionally restricted to one area
    pub fn list_tables(&self, area_id: Option<&str>) -> StorageResult<Vec<CafeTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        let mut tables = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let cafe_table: CafeTable = serde_json::from_slice(value.value())?;
            if area_id.is_none_or(|a| cafe_table.area_id == a) {
                tables.push(cafe_table);
            }
        }
        Ok(tables)
    }

    pub fn get_table(&self, table_id: &str) -> StorageResult<Option<CafeTable>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_menu_groups(&self) -> StorageResult<Vec<MenuGroup>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_GROUPS_TABLE)?;
        let mut groups = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            groups.push(serde_json::from_slice(value.value())?);
        }
        Ok(groups)
    }

    pub fn list_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        let mut items = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    pub fn get_menu_item(&self, item_id: &str) -> StorageResult<Option<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENU_ITEMS_TABLE)?;
        match table.get(item_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve the open order for a table via the open-order index
    ///
    /// The index entry is removed in the same transaction that closes an
    /// order, so a hit always refers to an `Open` order.
    pub fn open_order_for_table(&self, table_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let Some(order_id) = index.get(table_id)?.map(|g| g.value().to_string()) else {
            return Ok(None);
        };
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        match orders.get(order_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Current lines of an order, unsorted
    pub fn lines_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_LINES_TABLE)?;
        let mut lines = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let line: OrderLine = serde_json::from_slice(value.value())?;
            if line.order_id == order_id {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    pub fn payment_for_order(&self, order_id: &str) -> StorageResult<Option<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        for entry in table.iter()? {
            let (_, value) = entry?;
            let payment: Payment = serde_json::from_slice(value.value())?;
            if payment.order_id == order_id {
                return Ok(Some(payment));
            }
        }
        Ok(None)
    }

    /// Payments with `from <= paid_at < to` (epoch millis)
    pub fn payments_between(&self, from: i64, to: i64) -> StorageResult<Vec<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        let mut payments = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let payment: Payment = serde_json::from_slice(value.value())?;
            if payment.paid_at >= from && payment.paid_at < to {
                payments.push(payment);
            }
        }
        Ok(payments)
    }

    // ========== Transaction-Scoped Operations ==========
    // The lifecycle components compose these inside a single write
    // transaction; the commit is the serialization point.

    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<CafeTable>> {
        let table = txn.open_table(TABLES_TABLE)?;
        match table.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_table_txn(
        &self,
        txn: &WriteTransaction,
        cafe_table: &CafeTable,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(TABLES_TABLE)?;
        table.insert(
            cafe_table.id.as_str(),
            serde_json::to_vec(cafe_table)?.as_slice(),
        )?;
        Ok(())
    }

    /// Set a table's status, returning the updated record (None if absent)
    pub fn update_table_status_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
        status: TableStatus,
    ) -> StorageResult<Option<CafeTable>> {
        let Some(mut cafe_table) = self.get_table_txn(txn, table_id)? else {
            return Ok(None);
        };
        cafe_table.status = status;
        self.put_table_txn(txn, &cafe_table)?;
        Ok(Some(cafe_table))
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        table.insert(order.id.as_str(), serde_json::to_vec(order)?.as_slice())?;
        Ok(())
    }

    /// Conditional insert into the open-order index
    ///
    /// Fails with [`StorageError::OpenOrderExists`] when the table already
    /// has an open order; the existing order id is returned to the caller
    /// so it can re-read the winner instead of retrying the write.
    pub fn insert_open_order_txn(
        &self,
        txn: &WriteTransaction,
        order: &Order,
    ) -> StorageResult<()> {
        let mut index = txn.open_table(OPEN_ORDERS_TABLE)?;
        if let Some(existing) = index.get(order.table_id.as_str())? {
            return Err(StorageError::OpenOrderExists {
                table_id: order.table_id.clone(),
                order_id: existing.value().to_string(),
            });
        }
        index.insert(order.table_id.as_str(), order.id.as_str())?;
        Ok(())
    }

    pub fn remove_open_order_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<()> {
        let mut index = txn.open_table(OPEN_ORDERS_TABLE)?;
        index.remove(table_id)?;
        Ok(())
    }

    /// Create an open order: index entry, order record and table status flip
    /// in one transaction, so the one-open-order-per-table invariant and the
    /// table-status invariant can never be observed half-applied.
    pub fn try_create_open_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.begin_write()?;
        self.insert_open_order_txn(&txn, order)?;
        self.put_order_txn(&txn, order)?;
        self.update_table_status_txn(&txn, &order.table_id, TableStatus::InUse)?;
        txn.commit()?;
        Ok(())
    }

    pub fn get_line_txn(
        &self,
        txn: &WriteTransaction,
        line_id: &str,
    ) -> StorageResult<Option<OrderLine>> {
        let table = txn.open_table(ORDER_LINES_TABLE)?;
        match table.get(line_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a line through the `(order_id, item_id)` merge index
    pub fn find_line_by_item_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        item_id: &str,
    ) -> StorageResult<Option<OrderLine>> {
        let index = txn.open_table(LINE_INDEX_TABLE)?;
        let Some(line_id) = index.get((order_id, item_id))?.map(|g| g.value().to_string()) else {
            return Ok(None);
        };
        drop(index);
        self.get_line_txn(txn, &line_id)
    }

    /// Insert or update a line and its merge-index entry
    pub fn put_line_txn(&self, txn: &WriteTransaction, line: &OrderLine) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_LINES_TABLE)?;
        table.insert(line.id.as_str(), serde_json::to_vec(line)?.as_slice())?;
        drop(table);
        let mut index = txn.open_table(LINE_INDEX_TABLE)?;
        index.insert((line.order_id.as_str(), line.item_id.as_str()), line.id.as_str())?;
        Ok(())
    }

    /// Delete a line and its merge-index entry
    pub fn delete_line_txn(&self, txn: &WriteTransaction, line: &OrderLine) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_LINES_TABLE)?;
        table.remove(line.id.as_str())?;
        drop(table);
        let mut index = txn.open_table(LINE_INDEX_TABLE)?;
        index.remove((line.order_id.as_str(), line.item_id.as_str()))?;
        Ok(())
    }

    pub fn lines_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Vec<OrderLine>> {
        let table = txn.open_table(ORDER_LINES_TABLE)?;
        let mut lines = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let line: OrderLine = serde_json::from_slice(value.value())?;
            if line.order_id == order_id {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    pub fn insert_payment_txn(
        &self,
        txn: &WriteTransaction,
        payment: &Payment,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENTS_TABLE)?;
        table.insert(payment.id.as_str(), serde_json::to_vec(payment)?.as_slice())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CafeTable {
        CafeTable::new("t-1", "a-1", "A1")
    }

    #[test]
    fn table_roundtrip() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&sample_table()).unwrap();

        let loaded = storage.get_table("t-1").unwrap().unwrap();
        assert_eq!(loaded.name, "A1");
        assert_eq!(loaded.status, TableStatus::Empty);
        assert!(storage.get_table("t-9").unwrap().is_none());
    }

    #[test]
    fn open_order_insert_is_conditional() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&sample_table()).unwrap();

        let first = Order::open("t-1", "A1");
        storage.try_create_open_order(&first).unwrap();

        // Second insert for the same table must fail and name the winner.
        let second = Order::open("t-1", "A1");
        match storage.try_create_open_order(&second) {
            Err(StorageError::OpenOrderExists { table_id, order_id }) => {
                assert_eq!(table_id, "t-1");
                assert_eq!(order_id, first.id);
            }
            other => panic!("expected OpenOrderExists, got {other:?}"),
        }

        // The loser's order record must not have been committed.
        assert!(storage.get_order(&second.id).unwrap().is_none());
        let table = storage.get_table("t-1").unwrap().unwrap();
        assert_eq!(table.status, TableStatus::InUse);
    }

    #[test]
    fn removing_index_entry_allows_new_open_order() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.put_table(&sample_table()).unwrap();

        let first = Order::open("t-1", "A1");
        storage.try_create_open_order(&first).unwrap();

        let txn = storage.begin_write().unwrap();
        storage.remove_open_order_txn(&txn, "t-1").unwrap();
        txn.commit().unwrap();

        let second = Order::open("t-1", "A1");
        storage.try_create_open_order(&second).unwrap();
        let open = storage.open_order_for_table("t-1").unwrap().unwrap();
        assert_eq!(open.id, second.id);
    }

    #[test]
    fn line_merge_index_resolves_lines() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let line = OrderLine::new("o-1", "i-1", "Cà phê đen", 20000);

        let txn = storage.begin_write().unwrap();
        storage.put_line_txn(&txn, &line).unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let found = storage
            .find_line_by_item_txn(&txn, "o-1", "i-1")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, line.id);
        assert!(
            storage
                .find_line_by_item_txn(&txn, "o-1", "i-2")
                .unwrap()
                .is_none()
        );
        storage.delete_line_txn(&txn, &found).unwrap();
        txn.commit().unwrap();

        assert!(storage.lines_for_order("o-1").unwrap().is_empty());
    }
}
