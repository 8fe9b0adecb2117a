//! Order API Handlers
//!
//! Every mutation returns the refreshed order view, so clients never keep
//! a stale aggregate around between taps.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{Payment, PaymentMethod};

use crate::core::ServerState;
use crate::orders::{OrderLineBook, OrderManager, OrderView, PaymentFinalizer};
use crate::services::CatalogService;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeQuantityRequest {
    pub delta: i32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub method: PaymentMethod,
}

/// GET /api/orders/:id - 订单快照（行 + 合计）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let manager = OrderManager::new(state.storage.clone());
    Ok(Json(manager.order_view(&id)?))
}

/// POST /api/orders/:id/items - 加菜
///
/// 单品以目录当前价格与名称入单；同一单品重复添加合并为数量 +1。
pub async fn add_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<OrderView>> {
    let catalog = CatalogService::new(state.storage.clone());
    let item = catalog
        .get_item(&payload.item_id)?
        .ok_or_else(|| AppError::NotFound(format!("Menu item {} not found", payload.item_id)))?;
    if !item.is_active {
        return Err(AppError::Validation(format!(
            "Menu item {} is not available",
            item.name
        )));
    }

    let book = OrderLineBook::new(state.storage.clone());
    book.add_item(&id, &item.id, &item.name, item.price)?;

    let manager = OrderManager::new(state.storage.clone());
    Ok(Json(manager.order_view(&id)?))
}

/// POST /api/orders/:id/lines/:line_id - 改量（delta 可正可负）
///
/// 行已被并发删除时视为无事可做，照常返回最新快照。
pub async fn change_quantity(
    State(state): State<ServerState>,
    Path((id, line_id)): Path<(String, String)>,
    Json(payload): Json<ChangeQuantityRequest>,
) -> AppResult<Json<OrderView>> {
    let book = OrderLineBook::new(state.storage.clone());
    book.change_quantity(&line_id, payload.delta)?;

    let manager = OrderManager::new(state.storage.clone());
    Ok(Json(manager.order_view(&id)?))
}

/// POST /api/orders/:id/checkout - 结账
///
/// 原子完成：记录支付、关闭订单、释放桌台。重复结账返回 409。
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Payment>> {
    let finalizer = PaymentFinalizer::new(state.storage.clone());
    let payment = finalizer.finalize(&id, payload.method)?;
    Ok(Json(payment))
}
