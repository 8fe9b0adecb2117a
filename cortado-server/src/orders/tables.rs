//! TableRegistry - table occupancy status
//!
//! Owns the `Empty`/`InUse` flag and nothing else. Order creation is the
//! OrderManager's job; freeing happens inside the checkout transaction so
//! the status can never disagree with the open-order index.

use shared::models::{CafeTable, TableStatus};

use super::error::{OrderError, OrderResult};
use super::storage::OrderStorage;

#[derive(Clone)]
pub struct TableRegistry {
    storage: OrderStorage,
}

impl TableRegistry {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Mark a table as occupied. Idempotent: occupying an `InUse` table is
    /// a no-op that returns the current record.
    pub fn occupy(&self, table_id: &str) -> OrderResult<CafeTable> {
        let txn = self.storage.begin_write()?;
        let Some(table) = self.storage.get_table_txn(&txn, table_id)? else {
            return Err(OrderError::TableNotFound(table_id.to_string()));
        };
        if table.status == TableStatus::InUse {
            return Ok(table);
        }
        let updated = self
            .storage
            .update_table_status_txn(&txn, table_id, TableStatus::InUse)?
            .ok_or_else(|| OrderError::TableNotFound(table_id.to_string()))?;
        txn.commit()?;
        tracing::info!(table_id, table_name = %updated.name, "table occupied");
        Ok(updated)
    }

    /// Mark a table as free. Idempotent: freeing an `Empty` table is a
    /// no-op. Invoked by the payment finalizer once the owning order is
    /// closed (the checkout transaction flips the flag itself; this
    /// standalone form exists for recovery and tests).
    pub fn free(&self, table_id: &str) -> OrderResult<CafeTable> {
        let txn = self.storage.begin_write()?;
        let Some(table) = self.storage.get_table_txn(&txn, table_id)? else {
            return Err(OrderError::TableNotFound(table_id.to_string()));
        };
        if table.status == TableStatus::Empty {
            return Ok(table);
        }
        let updated = self
            .storage
            .update_table_status_txn(&txn, table_id, TableStatus::Empty)?
            .ok_or_else(|| OrderError::TableNotFound(table_id.to_string()))?;
        txn.commit()?;
        tracing::info!(table_id, table_name = %updated.name, "table freed");
        Ok(updated)
    }
}
