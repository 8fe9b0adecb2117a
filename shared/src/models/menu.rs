//! Menu Models

use serde::{Deserialize, Serialize};

/// Menu group entity (菜单分组)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuGroup {
    pub id: String,
    pub name: String,
    pub sort: i32,
}

/// Menu item entity
///
/// `price` is the unit price in the smallest currency unit. Items with
/// `is_active = false` are hidden from ordering but keep their history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub price: i64,
    pub is_active: bool,
    pub sort: i32,
}
