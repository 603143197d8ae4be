//! # Alert Repository
//!
//! Staff reminders and the browser push subscriptions they are sent to.
//!
//! Matching ("which alerts are due today") is pure and lives in
//! `gastro_core::alerts`; this repository only loads rows for it.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::new_id;
use crate::error::{DbError, DbResult};
use gastro_core::alerts::{due_alerts, DueAlerts};
use gastro_core::validation::{validate_alert_input, validate_subscription_input};
use gastro_core::{Alert, AlertInput, BusinessClock, Subscription, SubscriptionInput};

const SELECT_ALERT: &str = r#"
    SELECT id, title, description, alert_time, repeat_weekly, repeat_day, created_at
    FROM alerts
"#;

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, endpoint, p256dh, auth, created_at
    FROM subscriptions
"#;

/// Repository for alerts and push subscriptions.
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: SqlitePool,
}

impl AlertRepository {
    /// Creates a new AlertRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AlertRepository { pool }
    }

    /// All alerts, newest first.
    pub async fn list(&self) -> DbResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>(&format!(
            "{} ORDER BY created_at DESC",
            SELECT_ALERT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Gets an alert by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Alert> {
        sqlx::query_as::<_, Alert>(&format!("{} WHERE id = ?1", SELECT_ALERT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Alert", id))
    }

    /// Creates an alert. `repeat_day` is only kept for weekly alerts.
    pub async fn create(&self, input: &AlertInput) -> DbResult<Alert> {
        validate_alert_input(input)?;
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO alerts (id, title, description, alert_time, repeat_weekly, repeat_day, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.alert_time)
        .bind(input.repeat_weekly)
        .bind(if input.repeat_weekly { input.repeat_day } else { None })
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(id = %id, title = %input.title, weekly = input.repeat_weekly, "Alert created");
        self.get_by_id(&id).await
    }

    /// Deletes an alert.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Alert", id));
        }

        info!(id = %id, "Alert deleted");
        Ok(())
    }

    /// Alerts due on the local calendar day of `now`, plus every
    /// subscription to deliver them to.
    pub async fn due_today(&self, now: DateTime<Utc>, clock: &BusinessClock) -> DbResult<DueAlerts> {
        let alerts = due_alerts(self.list().await?, now, clock);
        let subscriptions = self.subscriptions().await?;

        debug!(
            alerts = alerts.len(),
            subscriptions = subscriptions.len(),
            "Matched alerts for today"
        );

        Ok(DueAlerts {
            alerts,
            subscriptions,
        })
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// All registered subscriptions.
    pub async fn subscriptions(&self) -> DbResult<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            "{} ORDER BY created_at",
            SELECT_SUBSCRIPTION
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    /// Registers a subscription, refreshing the keys when the endpoint is
    /// already known.
    pub async fn upsert_subscription(&self, input: &SubscriptionInput) -> DbResult<Subscription> {
        validate_subscription_input(input)?;
        let endpoint = input.endpoint.trim();

        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, endpoint, p256dh, auth, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (endpoint) DO UPDATE SET
                p256dh = excluded.p256dh,
                auth = excluded.auth
            "#,
        )
        .bind(new_id())
        .bind(endpoint)
        .bind(&input.keys.p256dh)
        .bind(&input.keys.auth)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(endpoint = %endpoint, "Push subscription registered");

        sqlx::query_as::<_, Subscription>(&format!("{} WHERE endpoint = ?1", SELECT_SUBSCRIPTION))
            .bind(endpoint)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Subscription", endpoint))
    }

    /// Removes a subscription by endpoint.
    pub async fn delete_subscription(&self, endpoint: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE endpoint = ?1")
            .bind(endpoint.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Subscription", endpoint));
        }

        info!(endpoint = %endpoint, "Push subscription removed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
