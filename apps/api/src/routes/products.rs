//! Product catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use gastro_core::{ProductDetail, ProductInput};

use super::IdQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

/// Query of `GET /product`.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Body of `PUT /product`: the id travels with the fields.
#[derive(Debug, Deserialize)]
pub struct ProductUpdateBody {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProductInput,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/product",
            get(list).post(create).put(update).delete(delete),
        )
        .route("/product/additions", get(additions))
        .route("/product/{id}", get(get_one))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> ApiResult<Json<Vec<ProductDetail>>> {
    let products = state.db.products().list(query.category.as_deref()).await?;
    Ok(Json(products))
}

async fn additions(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductDetail>>> {
    Ok(Json(state.db.products().additions().await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    Ok(Json(state.db.products().get_by_id(&id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<(StatusCode, Json<ProductDetail>)> {
    let product = state.db.products().create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProductUpdateBody>,
) -> ApiResult<Json<ProductDetail>> {
    Ok(Json(state.db.products().update(&body.id, &body.fields).await?))
}

async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.products().delete(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::test_support::TestApp;

    async fn ingredient(app: &TestApp, name: &str, quantity: Value) -> String {
        let (_, body) = app
            .post(
                "/ingredient",
                json!({ "name": name, "quantity": quantity, "price": 1000, "unit": "und" }),
            )
            .await;
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_update_and_fetch() {
        let app = TestApp::new().await;
        let bottle = ingredient(&app, "Club Colombia botella", json!(24)).await;
        let lime = ingredient(&app, "Limon", json!("insuficiente")).await;

        let (status, created) = app
            .post(
                "/product",
                json!({
                    "name": "Club Colombia",
                    "price": 8000,
                    "category": "Cervezas",
                    "ingredients": [{ "ingredientId": bottle, "quantity": 1 }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["stock"], 24.0);
        assert_eq!(created["trackedStock"], true);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = app
            .put(
                "/product",
                json!({
                    "id": id,
                    "name": "Michelada",
                    "price": 11000,
                    "category": "Cervezas",
                    "ingredients": [
                        { "ingredientId": bottle, "quantity": 1 },
                        { "ingredientId": lime, "quantity": 0.5 }
                    ]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["trackedStock"], false);

        let (status, fetched) = app.get(&format!("/product/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Michelada");
        assert_eq!(fetched["ingredients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_filters() {
        let app = TestApp::new().await;
        for (name, category) in [
            ("Queso extra", "Adiciones"),
            ("Tocineta", "Adiciones"),
            ("Mojito", "Cocteles"),
        ] {
            app.post(
                "/product",
                json!({ "name": name, "price": 3000, "category": category }),
            )
            .await;
        }

        let (_, all) = app.get("/product").await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, cocktails) = app.get("/product?category=cocteles").await;
        assert_eq!(cocktails.as_array().unwrap().len(), 1);

        let (status, additions) = app.get("/product/additions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(additions.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_conflicts_while_sold() {
        let app = TestApp::new().await;
        let (_, product) = app
            .post(
                "/product",
                json!({ "name": "Picada", "price": 30000, "category": "Platos" }),
            )
            .await;
        let id = product["id"].as_str().unwrap().to_string();

        app.post(
            "/sales",
            json!({
                "tableNumber": "2",
                "totalAmount": 30000,
                "products": [{ "productId": id, "quantity": 1 }]
            }),
        )
        .await;

        let (status, body) = app.delete(&format!("/product?id={}", id)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_linked_ingredient_delete_conflicts() {
        let app = TestApp::new().await;
        let mint = ingredient(&app, "Hierbabuena", json!(3)).await;
        app.post(
            "/product",
            json!({
                "name": "Mojito",
                "price": 22000,
                "category": "Cocteles",
                "ingredients": [{ "ingredientId": mint, "quantity": 0.2 }]
            }),
        )
        .await;

        let (status, _) = app.delete(&format!("/ingredient?id={}", mint)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
