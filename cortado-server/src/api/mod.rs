//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`areas`] - 区域列表
//! - [`tables`] - 桌台列表与开台
//! - [`menu`] - 菜单（分组 + 在售单品）
//! - [`orders`] - 订单操作（加菜、改量、结账）
//! - [`history`] - 历史账单查询

pub mod areas;
pub mod health;
pub mod history;
pub mod menu;
pub mod orders;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(areas::router())
        .merge(tables::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(history::router())
        .with_state(state)
}
