//! # gastro-api: HTTP Layer for the Gastrobar Back Office
//!
//! Thin axum handlers over `gastro-db` repositories and `gastro-core` rules.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /health                      liveness + database check                 │
//! │                                                                         │
//! │  /sales ──────────────────── tickets (today, create, replace, delete)  │
//! │  /sales/daily                business-day totals + moving average      │
//! │                                                                         │
//! │  /ingredient, /product ───── inventory and catalog                     │
//! │                                                                         │
//! │  /providers ──────────────── providers, balances, WhatsApp order link  │
//! │  /provider-movements         invoice / payment ledger                  │
//! │                                                                         │
//! │  /alerts, /subscriptions ─── staff reminders and push registration     │
//! │  /notifications/dispatch     push due alerts                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every handler returns `Result<_, ApiError>`; no error leaves the router
//! without the `{ code, message }` body.

pub mod config;
pub mod error;
pub mod extract;
pub mod push;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use gastro_core::BusinessClock;
use gastro_db::Database;

use crate::config::ApiConfig;
use crate::push::PushSender;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub clock: BusinessClock,
    pub push: Arc<dyn PushSender>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig, push: Arc<dyn PushSender>) -> Self {
        AppState {
            db,
            clock: config.clock(),
            config: Arc::new(config),
            push,
        }
    }
}

/// Builds the full router with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::sales::router())
        .merge(routes::ingredients::router())
        .merge(routes::products::router())
        .merge(routes::providers::router())
        .merge(routes::alerts::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
