//! Cafe Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::CafeTable;

use crate::core::ServerState;
use crate::orders::{OrderManager, OrderView, TableRegistry};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 区域过滤
    pub area: Option<String>,
}

/// GET /api/tables?area= - 获取桌台（含占用状态，按名称排序）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CafeTable>>> {
    let mut tables = state.storage.list_tables(query.area.as_deref())?;
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CafeTable>> {
    let table = state
        .storage
        .get_table(&id)?
        .ok_or_else(|| AppError::NotFound(format!("Table {id} not found")))?;
    Ok(Json(table))
}

/// POST /api/tables/:id/open - 开台
///
/// 幂等：桌台已占用时返回当前未结订单，不会重复建单。
pub async fn open(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let registry = TableRegistry::new(state.storage.clone());
    registry.occupy(&id)?;

    let manager = OrderManager::new(state.storage.clone());
    let order = manager.ensure_open_order(&id)?;
    Ok(Json(manager.order_view(&order.id)?))
}
