//! Order lifecycle errors

use super::storage::StorageError;
use thiserror::Error;

/// Lifecycle errors
///
/// Conflicts on the idempotent paths (`ensure_open_order`, `add_item`) are
/// resolved internally by re-reading; only an exhausted retry loop surfaces
/// here. Conflicts on non-idempotent paths (`finalize`) surface immediately
/// as [`OrderError::AlreadyPaid`].
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already paid: {0}")]
    AlreadyPaid(String),

    #[error("Order has no lines: {0}")]
    EmptyOrder(String),

    #[error("Open-order conflict for table {0} not resolved after repeated retries")]
    ConflictRetryExhausted(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// A bare `txn.commit()` in the lifecycle code yields a `redb::CommitError`;
/// route it through the existing [`StorageError::Commit`] variant so `?` works
/// without introducing a new `OrderError` variant.
impl From<redb::CommitError> for OrderError {
    fn from(err: redb::CommitError) -> Self {
        OrderError::Storage(StorageError::Commit(err))
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
