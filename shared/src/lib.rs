//! Shared types for the Cortado POS
//!
//! Domain models and small utilities used by the edge server and any
//! future client crates. Everything here is plain serde data, no I/O.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
