//! Cafe Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
///
/// `InUse` holds exactly while an open order references the table; the
/// storage layer flips both sides inside the same transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Empty,
    InUse,
}

/// Cafe table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeTable {
    pub id: String,
    pub area_id: String,
    pub name: String,
    pub status: TableStatus,
}

impl CafeTable {
    pub fn new(id: impl Into<String>, area_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            area_id: area_id.into(),
            name: name.into(),
            status: TableStatus::Empty,
        }
    }
}
