//! Area API Handlers

use axum::{Json, extract::State};
use shared::models::Area;

use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/areas - 获取所有区域（按 sort 排序）
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Area>>> {
    let mut areas = state.storage.list_areas()?;
    areas.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
    Ok(Json(areas))
}
