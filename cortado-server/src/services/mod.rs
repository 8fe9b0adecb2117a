//! Read-only collaborator services
//!
//! - [`catalog`] - menu groups and sellable items
//! - [`history`] - past payments and paid-order details

pub mod catalog;
pub mod history;

pub use catalog::CatalogService;
pub use history::{HistoryPage, HistoryService, OrderDetail};
