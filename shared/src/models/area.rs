//! Area Model

use serde::{Deserialize, Serialize};

/// Area entity (区域：大厅、露台、外卖等)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    pub sort: i32,
}
