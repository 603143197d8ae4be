//! # Alert Routes
//!
//! Staff reminders, browser push subscriptions and delivery of the alerts
//! due today.
//!
//! ```text
//! ┌────────────┐  POST /subscriptions   ┌──────────────┐
//! │  Browser   │ ─────────────────────► │ subscriptions│
//! └────────────┘                        └──────┬───────┘
//!       ▲                                      │
//!       │ push                                 ▼
//! ┌─────┴──────┐  POST /notifications/  ┌──────────────┐
//! │ PushSender │ ◄──── dispatch ─────── │ alerts due   │
//! └────────────┘                        │ today        │
//!                                       └──────────────┘
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use gastro_core::alerts::DueAlerts;
use gastro_core::{Alert, AlertInput, Subscription, SubscriptionInput};

use super::IdQuery;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::push::{dispatch, DispatchReport};
use crate::AppState;

/// Query of `DELETE /subscriptions`.
#[derive(Debug, Deserialize)]
pub struct EndpointQuery {
    pub endpoint: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list).post(create).delete(delete))
        .route("/alerts/today", get(due_today))
        .route("/subscriptions", post(subscribe).delete(unsubscribe))
        .route("/notifications/dispatch", post(dispatch_due))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(state.db.alerts().list().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AlertInput>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let alert = state.db.alerts().create(&input).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn delete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<IdQuery>,
) -> ApiResult<StatusCode> {
    state.db.alerts().delete(&query.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn due_today(State(state): State<AppState>) -> ApiResult<Json<DueAlerts>> {
    Ok(Json(state.db.alerts().due_today(Utc::now(), &state.clock).await?))
}

/// Registers the browser, or refreshes its keys if already known.
async fn subscribe(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubscriptionInput>,
) -> ApiResult<(StatusCode, Json<Subscription>)> {
    let subscription = state.db.alerts().upsert_subscription(&input).await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

async fn unsubscribe(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EndpointQuery>,
) -> ApiResult<StatusCode> {
    state.db.alerts().delete_subscription(&query.endpoint).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pushes every alert due today to every subscription. Individual
/// delivery failures are reported in the body, not as a failed request.
async fn dispatch_due(State(state): State<AppState>) -> ApiResult<Json<DispatchReport>> {
    let due = state.db.alerts().due_today(Utc::now(), &state.clock).await?;
    Ok(Json(dispatch(state.push.as_ref(), &due).await))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::push::tests::RecordingSender;
    use crate::test_support::TestApp;
    use gastro_core::BusinessClock;

    fn subscription(endpoint: &str) -> serde_json::Value {
        json!({ "endpoint": endpoint, "keys": { "p256dh": "BNcRdreALRFX", "auth": "tBHItJI5" } })
    }

    async fn seed_alerts(app: &TestApp) {
        let today = BusinessClock::default().weekday_number(Utc::now());

        let (status, _) = app
            .post(
                "/alerts",
                json!({ "title": "Pedir hielo", "repeatWeekly": true, "repeatDay": today }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        app.post(
            "/alerts",
            json!({
                "title": "Fumigación",
                "repeatWeekly": true,
                "repeatDay": (today + 1) % 7
            }),
        )
        .await;
        app.post(
            "/alerts",
            json!({
                "title": "Pagar arriendo",
                "repeatWeekly": false,
                "alertTime": (Utc::now() + Duration::days(3)).to_rfc3339()
            }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_due_today() {
        let app = TestApp::new().await;
        seed_alerts(&app).await;
        app.post("/subscriptions", subscription("https://push.example.com/a"))
            .await;

        let (status, due) = app.get("/alerts/today").await;
        assert_eq!(status, StatusCode::OK);
        let alerts = due["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["title"], "Pedir hielo");
        assert_eq!(due["subscriptions"].as_array().unwrap().len(), 1);

        let (_, all) = app.get("/alerts").await;
        assert_eq!(all.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_alert() {
        let app = TestApp::new().await;
        let (status, body) = app
            .post(
                "/alerts",
                json!({ "title": "Sin fecha", "repeatWeekly": false }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = app
            .post(
                "/alerts",
                json!({ "title": "Dia 7", "repeatWeekly": true, "repeatDay": 7 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_subscription_lifecycle() {
        let app = TestApp::new().await;

        let (status, first) = app
            .post("/subscriptions", subscription("https://push.example.com/a"))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, second) = app
            .post("/subscriptions", subscription("https://push.example.com/a"))
            .await;
        assert_eq!(first["id"], second["id"]);

        let (status, _) = app
            .post("/subscriptions", subscription("not a url"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .delete("/subscriptions?endpoint=https%3A%2F%2Fpush.example.com%2Fa")
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app
            .delete("/subscriptions?endpoint=https%3A%2F%2Fpush.example.com%2Fa")
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_reports_failures_per_endpoint() {
        let sender = Arc::new(RecordingSender::default());
        let app = TestApp::with_sender(sender.clone()).await;
        seed_alerts(&app).await;
        app.post("/subscriptions", subscription("https://push.example.com/ok"))
            .await;
        app.post("/subscriptions", subscription("https://push.example.com/gone"))
            .await;

        let (status, report) = app
            .request(axum::http::Method::POST, "/notifications/dispatch", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["alerts"], 1);
        assert_eq!(report["subscriptions"], 2);
        assert_eq!(report["delivered"], 1);
        assert_eq!(report["failed"], 1);

        let failed = report["outcomes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|o| o["delivered"] == false)
            .unwrap();
        assert_eq!(failed["endpoint"], "https://push.example.com/gone");
        assert_eq!(failed["error"]["code"], "EXTERNAL_SERVICE");

        assert_eq!(sender.sent.lock().await.len(), 1);
    }
}
