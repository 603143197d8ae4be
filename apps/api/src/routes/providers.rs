//! # Provider Routes
//!
//! Providers, the ingredients they supply, and their invoice/payment
//! ledger.
//!
//! ```text
//! balance = Σ INVOICE − Σ PAYMENT      (> 0: we owe the provider)
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use gastro_core::ordering::{order_link, OrderLink};
use gastro_core::{
    MovementInput, Provider, ProviderDetail, ProviderInput, ProviderLedger, ProviderMovement,
    ProviderSummary, ProviderUpdate,
};

use super::IdQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// Query of `GET /provider-movements`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub provider_id: String,
}

/// Body of `PUT /providers/{id}/ingredients`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientIdsBody {
    pub ingredient_ids: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/providers",
            get(list).post(create).put(update).delete(delete),
        )
        .route("/providers/{id}", get(get_one))
        .route("/providers/{id}/ingredients", put(set_ingredients))
        .route("/providers/{id}/order-link", get(get_order_link))
        .route(
            "/provider-movements",
            get(ledger).post(record_movement).delete(delete_movement),
        )
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProviderSummary>>> {
    Ok(Json(state.db.providers().list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProviderDetail>> {
    Ok(Json(state.db.providers().get_detail(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProviderInput>,
) -> ApiResult<(StatusCode, Json<Provider>)> {
    let provider = state.db.providers().create(&input).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProviderUpdate>,
) -> ApiResult<Json<Provider>> {
    Ok(Json(state.db.providers().update(&input).await?))
}

/// Deletes the provider together with its movements and associations.
async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.providers().delete(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_ingredients(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<IngredientIdsBody>,
) -> ApiResult<Json<ProviderDetail>> {
    let detail = state
        .db
        .providers()
        .set_ingredients(&id, &body.ingredient_ids)
        .await?;
    Ok(Json(detail))
}

/// WhatsApp link asking the provider for every supplied ingredient that
/// is currently marked insuficiente.
async fn get_order_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderLink>> {
    let repo = state.db.providers();
    let provider = repo.get_by_id(&id).await?;
    let ingredients = repo.ingredients_of(&id).await?;
    Ok(Json(order_link(&provider, &ingredients)?))
}

async fn ledger(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LedgerQuery>,
) -> ApiResult<Json<ProviderLedger>> {
    Ok(Json(state.db.providers().ledger(&query.provider_id).await?))
}

async fn record_movement(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<MovementInput>,
) -> ApiResult<(StatusCode, Json<ProviderMovement>)> {
    let movement = state.db.providers().record_movement(&input).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

async fn delete_movement(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.providers().delete_movement(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
