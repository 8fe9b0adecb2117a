//! Order/Table Lifecycle for the Cortado Server
//!
//! This module implements the core POS workflow:
//!
//! - **tables**: TableRegistry - occupancy status (`Empty`/`InUse`)
//! - **manager**: OrderManager - one open order per table, find-or-create
//! - **lines**: OrderLineBook - merged line items and re-derived totals
//! - **checkout**: PaymentFinalizer - atomic payment + close + free
//! - **storage**: redb persistence with conditional atomic writes
//! - **money**: integer minor-unit validation
//!
//! # Architecture
//!
//! ```text
//! occupy(table) → ensure_open_order(table) → add_item/change_quantity (×N)
//!                                                      ↓
//!                                          finalize(order, method)
//!                                                      ↓
//!                             payment recorded · order Paid · table Empty
//! ```
//!
//! Every invariant-bearing write (open-order creation, line upsert, the
//! `Open → Paid` transition) happens inside a single storage write
//! transaction; callers never compose a read-then-write sequence of their
//! own.

pub mod checkout;
pub mod error;
pub mod lines;
pub mod manager;
pub mod money;
pub mod storage;
pub mod tables;

// Re-exports
pub use checkout::PaymentFinalizer;
pub use error::{OrderError, OrderResult};
pub use lines::{OrderLineBook, QuantityChange};
pub use manager::{OrderManager, OrderView};
pub use storage::{OrderStorage, StorageError};
pub use tables::TableRegistry;
