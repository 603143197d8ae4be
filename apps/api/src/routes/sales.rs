//! # Sale Routes
//!
//! Tickets as whole aggregates (sale + lines + additions) and the daily
//! sales report.
//!
//! ## Report Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /sales/daily?days=30&window=7                                      │
//! │                                                                         │
//! │  1. validate days (1..=REPORT_MAX_DAYS) and window (1..=90)            │
//! │  2. amounts_since(now - days)          created_at + total_amount      │
//! │  3. build_daily_report                  bucket by business day (06:00) │
//! │                                         trailing moving average        │
//! │                                         % variation vs previous day    │
//! │  4. buckets newest first                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use gastro_core::report::{build_daily_report, DailyReport};
use gastro_core::validation::{parse_sale_status, validate_report_days, validate_window};
use gastro_core::{Sale, SaleDetail, SaleInput};

use super::IdQuery;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// Query of `GET /sales/daily`.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub days: Option<i64>,
    pub window: Option<usize>,
}

/// Body of `PUT /sales/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_today).post(create).delete(delete))
        .route("/sales/daily", get(daily_report))
        .route("/sales/{id}", get(get_one).put(replace))
        .route("/sales/{id}/status", put(update_status))
}

/// Sales touched during the current local calendar day.
async fn list_today(State(state): State<AppState>) -> ApiResult<Json<Vec<SaleDetail>>> {
    let (start, end) = state.clock.calendar_day_bounds(Utc::now());
    let sales = state.db.sales().list_updated_between(start, end).await?;
    Ok(Json(sales))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SaleInput>,
) -> ApiResult<(StatusCode, Json<SaleDetail>)> {
    let sale = state.db.sales().create(&input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleDetail>> {
    Ok(Json(state.db.sales().get_by_id(&id).await?))
}

/// Replaces the whole ticket; the id stays the same.
async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SaleInput>,
) -> ApiResult<Json<SaleDetail>> {
    Ok(Json(state.db.sales().replace(&id, &input).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<Sale>> {
    let status = parse_sale_status(&body.status)?;
    Ok(Json(state.db.sales().update_status(&id, status).await?))
}

async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.sales().delete(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn daily_report(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DailyQuery>,
) -> ApiResult<Json<DailyReport>> {
    let days = query.days.unwrap_or(state.config.report_default_days);
    let window = query.window.unwrap_or(state.config.moving_average_window);
    validate_report_days(days, state.config.report_max_days)?;
    validate_window(window)?;

    let since = Duration::try_days(days)
        .and_then(|span| Utc::now().checked_sub_signed(span))
        .ok_or_else(|| ApiError::validation(format!("days out of range: {}", days)))?;
    let rows = state.db.sales().amounts_since(since).await?;
    debug!(days, window, rows = rows.len(), "Building daily report");

    Ok(Json(build_daily_report(&rows, &state.clock, days, window)))
}

// =============================================================================
// Tests
// =============================================================================
