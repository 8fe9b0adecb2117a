//! Data models
//!
//! Shared between cortado-server and frontend (via API).
//! All IDs are UUIDv4 strings; all timestamps are epoch milliseconds;
//! all monetary amounts are non-negative integers in the smallest
//! currency unit.

pub mod area;
pub mod cafe_table;
pub mod menu;
pub mod order;
pub mod payment;

// Re-exports
pub use area::*;
pub use cafe_table::*;
pub use menu::*;
pub use order::*;
pub use payment::*;
