//! # Alerts Module
//!
//! Decides which alerts are due on the current local calendar day.
//!
//! ```text
//! ┌──────────────────────────┬─────────────────────────────────────────────┐
//! │ Alert kind               │ Due today when                              │
//! ├──────────────────────────┼─────────────────────────────────────────────┤
//! │ one-time                 │ alert_time in [local 00:00, next 00:00)     │
//! │ weekly (repeat_weekly)   │ repeat_day == weekday (0 = Sunday)          │
//! │                          │ alert_time is ignored                       │
//! └──────────────────────────┴─────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::BusinessClock;
use crate::types::{Alert, Subscription};

/// Whether `alert` fires on the local calendar day containing `now`.
pub fn is_due_today(alert: &Alert, now: DateTime<Utc>, clock: &BusinessClock) -> bool {
    if alert.repeat_weekly {
        return alert.repeat_day == Some(clock.weekday_number(now));
    }

    match alert.alert_time {
        Some(at) => {
            let (start, end) = clock.calendar_day_bounds(now);
            at >= start && at < end
        }
        None => false,
    }
}

/// Filters the alerts due today, preserving order.
pub fn due_alerts(alerts: Vec<Alert>, now: DateTime<Utc>, clock: &BusinessClock) -> Vec<Alert> {
    alerts
        .into_iter()
        .filter(|alert| is_due_today(alert, now, clock))
        .collect()
}

/// Response of `GET /alerts/today`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DueAlerts {
    pub alerts: Vec<Alert>,
    pub subscriptions: Vec<Subscription>,
}

/// JSON payload delivered to a push endpoint for one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PushPayload {
    pub alert_id: String,
    pub title: String,
    pub body: String,
}

impl From<&Alert> for PushPayload {
    fn from(alert: &Alert) -> Self {
        PushPayload {
            alert_id: alert.id.clone(),
            title: alert.title.clone(),
            body: alert.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn clock() -> BusinessClock {
        BusinessClock::new(FixedOffset::west_opt(5 * 3600).unwrap(), 6)
    }

    fn at(clock: &BusinessClock, d: u32, h: u32) -> DateTime<Utc> {
        clock
            .offset()
            .with_ymd_and_hms(2024, 6, d, h, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn alert(alert_time: Option<DateTime<Utc>>, repeat_weekly: bool, repeat_day: Option<u32>) -> Alert {
        Alert {
            id: "a-1".to_string(),
            title: "Pedir hielo".to_string(),
            description: Some("Dos bolsas".to_string()),
            alert_time,
            repeat_weekly,
            repeat_day,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_weekly_alert_matches_wednesdays_only() {
        let c = clock();
        // alert_time points at a Monday; it must not matter
        let weekly = alert(Some(at(&c, 10, 9)), true, Some(3));

        // 2024-06-12 and 2024-06-19 are Wednesdays
        assert!(is_due_today(&weekly, at(&c, 12, 8), &c));
        assert!(is_due_today(&weekly, at(&c, 19, 23), &c));
        for day in [9, 10, 11, 13, 14, 15] {
            assert!(!is_due_today(&weekly, at(&c, day, 12), &c), "day {}", day);
        }
    }

    #[test]
    fn test_one_time_alert_uses_local_calendar_day() {
        let c = clock();
        let once = alert(Some(at(&c, 10, 1)), false, None);

        assert!(is_due_today(&once, at(&c, 10, 22), &c));
        assert!(!is_due_today(&once, at(&c, 9, 22), &c));
        assert!(!is_due_today(&once, at(&c, 10, 22) + Duration::hours(3), &c));
    }

    #[test]
    fn test_one_time_alert_without_time_never_fires() {
        let c = clock();
        assert!(!is_due_today(&alert(None, false, None), at(&c, 10, 12), &c));
    }

    #[test]
    fn test_due_alerts_filters() {
        let c = clock();
        let alerts = vec![
            alert(Some(at(&c, 10, 9)), false, None),
            alert(None, true, Some(1)),
            alert(None, true, Some(2)),
        ];
        // 2024-06-10 is a Monday
        assert_eq!(due_alerts(alerts, at(&c, 10, 12), &c).len(), 2);
    }

    #[test]
    fn test_payload_from_alert() {
        let payload = PushPayload::from(&alert(None, true, Some(1)));
        assert_eq!(payload.title, "Pedir hielo");
        assert_eq!(payload.body, "Dos bolsas");
    }
}
