//! History API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::{HistoryPage, HistoryService, OrderDetail};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 起始日期 YYYY-MM-DD（含），缺省今天
    pub from: Option<String>,
    /// 结束日期 YYYY-MM-DD（不含），缺省起始日的次日
    pub to: Option<String>,
}

fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {s}")))
}

fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// GET /api/history?from=&to= - 区间内的支付记录与营收合计
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<HistoryPage>> {
    let from_date = match &query.from {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let to_date = match &query.to {
        Some(s) => parse_date(s)?,
        None => from_date.succ_opt().unwrap_or(from_date),
    };

    let history = HistoryService::new(state.storage.clone());
    let page = history.payments_between(day_start_millis(from_date), day_start_millis(to_date))?;
    Ok(Json(page))
}

/// GET /api/history/orders/:id - 单笔账单明细
pub async fn order_detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let history = HistoryService::new(state.storage.clone());
    Ok(Json(history.order_detail(&id)?))
}
