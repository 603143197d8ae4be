//! # Push Delivery
//!
//! Sends due alerts to registered browsers.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /notifications/dispatch                                           │
//! │                                                                         │
//! │  AlertRepository::due_today ──► DueAlerts { alerts, subscriptions }    │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                 for alert in alerts, for sub in subscriptions           │
//! │                     PushSender::send(sub, payload)                      │
//! │                        │                    │                           │
//! │                      Ok(())              Err(PushError)                 │
//! │                        │                    │                           │
//! │                   delivered += 1     outcome.error = EXTERNAL_SERVICE   │
//! │                                                                         │
//! │  One failing endpoint never fails the request.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use gastro_core::alerts::{DueAlerts, PushPayload};
use gastro_core::Subscription;

/// Failure to hand a payload to a push endpoint.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("Push endpoint {endpoint} rejected the message: {reason}")]
    Rejected { endpoint: String, reason: String },
}

/// Delivers one payload to one subscription.
///
/// Implementations must be safe to share across requests.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, subscription: &Subscription, payload: &PushPayload) -> Result<(), PushError>;
}

/// Default sender: records the delivery in the log and reports success.
#[derive(Debug, Default, Clone)]
pub struct LoggingPushSender;

#[async_trait]
impl PushSender for LoggingPushSender {
    async fn send(&self, subscription: &Subscription, payload: &PushPayload) -> Result<(), PushError> {
        info!(
            endpoint = %subscription.endpoint,
            alert_id = %payload.alert_id,
            title = %payload.title,
            "Push notification delivered"
        );
        Ok(())
    }
}

/// Result of one (alert, subscription) delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    pub alert_id: String,
    pub endpoint: String,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response of `POST /notifications/dispatch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub alerts: usize,
    pub subscriptions: usize,
    pub delivered: usize,
    pub failed: usize,
    pub outcomes: Vec<DeliveryOutcome>,
}

/// Sends every due alert to every subscription.
pub async fn dispatch(sender: &dyn PushSender, due: &DueAlerts) -> DispatchReport {
    let mut outcomes = Vec::with_capacity(due.alerts.len() * due.subscriptions.len());

    for alert in &due.alerts {
        let payload = PushPayload::from(alert);
        for subscription in &due.subscriptions {
            let error = match sender.send(subscription, &payload).await {
                Ok(()) => None,
                Err(e) => {
                    warn!(endpoint = %subscription.endpoint, alert_id = %alert.id, error = %e, "Push failed");
                    Some(ApiError::external(e.to_string()))
                }
            };
            outcomes.push(DeliveryOutcome {
                alert_id: alert.id.clone(),
                endpoint: subscription.endpoint.clone(),
                delivered: error.is_none(),
                error,
            });
        }
    }

    let delivered = outcomes.iter().filter(|o| o.delivered).count();
    let report = DispatchReport {
        alerts: due.alerts.len(),
        subscriptions: due.subscriptions.len(),
        delivered,
        failed: outcomes.len() - delivered,
        outcomes,
    };

    info!(
        alerts = report.alerts,
        subscriptions = report.subscriptions,
        delivered = report.delivered,
        failed = report.failed,
        "Notification dispatch finished"
    );
    report
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use gastro_core::{Alert, PushKeys};
    use tokio::sync::Mutex;

    use crate::error::ErrorCode;

    /// Records deliveries and fails for endpoints containing "gone".
    #[derive(Default)]
    pub(crate) struct RecordingSender {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PushSender for RecordingSender {
        async fn send(
            &self,
            subscription: &Subscription,
            payload: &PushPayload,
        ) -> Result<(), PushError> {
            if subscription.endpoint.contains("gone") {
                return Err(PushError::Rejected {
                    endpoint: subscription.endpoint.clone(),
                    reason: "410 Gone".to_string(),
                });
            }
            self.sent
                .lock()
                .await
                .push((subscription.endpoint.clone(), payload.alert_id.clone()));
            Ok(())
        }
    }

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            title: "Pedir hielo".to_string(),
            description: None,
            alert_time: None,
            repeat_weekly: true,
            repeat_day: Some(3),
            created_at: Utc::now(),
        }
    }

    fn subscription(endpoint: &str) -> Subscription {
        Subscription {
            id: endpoint.to_string(),
            endpoint: endpoint.to_string(),
            keys: PushKeys {
                p256dh: "p".to_string(),
                auth: "a".to_string(),
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failures_are_reported_per_endpoint() {
        let sender = RecordingSender::default();
        let due = DueAlerts {
            alerts: vec![alert("a1"), alert("a2")],
            subscriptions: vec![
                subscription("https://push.example.com/ok"),
                subscription("https://push.example.com/gone"),
            ],
        };

        let report = dispatch(&sender, &due).await;

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.delivered, 2);
        assert_eq!(report.failed, 2);
        let failure = report
            .outcomes
            .iter()
            .find(|o| !o.delivered)
            .and_then(|o| o.error.as_ref())
            .unwrap();
        assert_eq!(failure.code, ErrorCode::ExternalService);
        assert_eq!(sender.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_nothing_due_sends_nothing() {
        let due = DueAlerts {
            alerts: vec![],
            subscriptions: vec![subscription("https://push.example.com/ok")],
        };
        let report = dispatch(&LoggingPushSender, &due).await;
        assert_eq!(report.delivered, 0);
        assert!(report.outcomes.is_empty());
    }
}
