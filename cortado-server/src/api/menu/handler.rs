//! Menu API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{MenuGroup, MenuItem};

use crate::core::ServerState;
use crate::services::CatalogService;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// 分组过滤
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub groups: Vec<MenuGroup>,
    pub items: Vec<MenuItem>,
}

/// GET /api/menu?group= - 菜单：分组 + 在售单品
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<MenuResponse>> {
    let catalog = CatalogService::new(state.storage.clone());
    let groups = catalog.list_groups()?;
    let items = catalog.list_active_items(query.group.as_deref())?;
    Ok(Json(MenuResponse { groups, items }))
}
