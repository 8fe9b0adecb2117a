//! History API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/history", get(handler::list))
        .route("/api/history/orders/{id}", get(handler::order_detail))
}
