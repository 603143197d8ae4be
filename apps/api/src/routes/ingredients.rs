//! Ingredient inventory routes.
//!
//! `PUT /ingredient` is the inventory screen's "save all" button: a batch
//! of `{ id, quantity }` applied in one transaction, where `quantity` may
//! be a number, a numeric string, `null` or `"insuficiente"`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};

use gastro_core::{Ingredient, IngredientInput, StockUpdate};

use super::IdQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredient",
            get(list).post(create).put(update_stock).delete(delete),
        )
        .route("/ingredient/{id}", put(update))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Ingredient>>> {
    Ok(Json(state.db.ingredients().list().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<IngredientInput>,
) -> ApiResult<(StatusCode, Json<Ingredient>)> {
    let ingredient = state.db.ingredients().create(&input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<IngredientInput>,
) -> ApiResult<Json<Ingredient>> {
    Ok(Json(state.db.ingredients().update(&id, &input).await?))
}

async fn update_stock(
    State(state): State<AppState>,
    ApiJson(updates): ApiJson<Vec<StockUpdate>>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    Ok(Json(state.db.ingredients().update_stock(&updates).await?))
}

async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.ingredients().delete(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::TestApp;

    async fn create(app: &TestApp, name: &str, quantity: serde_json::Value) -> String {
        let (status, body) = app
            .post(
                "/ingredient",
                json!({ "name": name, "quantity": quantity, "price": 2500, "unit": "und" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_insuficiente_is_stored_as_null() {
        let app = TestApp::new().await;
        let lime = create(&app, "Limon", json!("Insuficiente ")).await;

        let (_, list) = app.get("/ingredient").await;
        let row = list
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["id"] == lime.as_str())
            .unwrap();
        assert!(row["quantity"].is_null());
    }

    #[tokio::test]
    async fn test_batch_stock_update() {
        let app = TestApp::new().await;
        let rum = create(&app, "Ron blanco", json!(3000)).await;
        let mint = create(&app, "Hierbabuena", json!(4)).await;

        let (status, body) = app
            .put(
                "/ingredient",
                json!([
                    { "id": rum, "quantity": "2750.5" },
                    { "id": mint, "quantity": "insuficiente" }
                ]),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, list) = app.get("/ingredient").await;
        for row in list.as_array().unwrap() {
            if row["id"] == rum.as_str() {
                assert_eq!(row["quantity"], 2750.5);
            } else {
                assert!(row["quantity"].is_null());
            }
        }
    }

    #[tokio::test]
    async fn test_batch_rolls_back_on_unknown_id() {
        let app = TestApp::new().await;
        let rum = create(&app, "Ron blanco", json!(3000)).await;

        let (status, body) = app
            .put(
                "/ingredient",
                json!([
                    { "id": rum, "quantity": 10 },
                    { "id": "550e8400-e29b-41d4-a716-446655440000", "quantity": 1 }
                ]),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let ingredient = app.db.ingredients().get_by_id(&rum).await.unwrap();
        assert_eq!(ingredient.quantity, Some(3000.0));
    }

    #[tokio::test]
    async fn test_negative_quantity_is_rejected() {
        let app = TestApp::new().await;
        let (status, _) = app
            .post(
                "/ingredient",
                json!({ "name": "Hielo", "quantity": -1, "price": 0, "unit": "kg" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let app = TestApp::new().await;
        let id = create(&app, "Hielo", json!(10)).await;

        let (status, body) = app
            .put(
                &format!("/ingredient/{}", id),
                json!({ "name": "Hielo en cubos", "quantity": 8, "price": 3000, "unit": "kg" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Hielo en cubos");

        let (status, _) = app.delete(&format!("/ingredient?id={}", id)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.delete(&format!("/ingredient?id={}", id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
