//! # Report Module
//!
//! Daily sales totals by business day, with trailing moving averages and
//! day-over-day variation.
//!
//! ## Pipeline
//! ```text
//! ┌────────────────┐    ┌─────────────────────┐    ┌──────────────────────┐
//! │  SaleAmount    │───►│ bucket_daily_totals │───►│ moving_average       │
//! │  rows since    │    │ group by business   │    │ variation_percent    │
//! │  now - days    │    │ day, chronological  │    │ (chronological)      │
//! └────────────────┘    └─────────────────────┘    └──────────┬───────────┘
//!                                                             │
//!                                                             ▼
//!                                               DailyReport, newest first
//! ```
//!
//! Only days that had sales produce a bucket. Averages use the buckets
//! that exist; missing days are not padded with zeros.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::{weekday_label, BusinessClock};
use crate::money::Money;

/// The two columns of a sale the report needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleAmount {
    pub created_at: DateTime<Utc>,
    pub total_amount: Money,
}

/// Sum of one business day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotal {
    pub business_day: NaiveDate,
    pub total: Money,
    pub sales_count: i64,
}

/// One row of the daily report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyBucket {
    #[ts(as = "String")]
    pub business_day: NaiveDate,
    /// Spanish weekday name of the business day ("Lunes", ...).
    pub weekday: String,
    pub total: Money,
    pub sales_count: i64,
    /// Trailing average of `total` over the last `window` buckets.
    pub moving_average: f64,
    /// Percent change against the previous bucket; null for the first
    /// bucket or when the previous total was zero.
    pub variation_percent: Option<f64>,
}

/// Response of `GET /sales/daily`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyReport {
    pub days: i64,
    pub window: usize,
    /// Sum over every bucket in the range.
    pub total: Money,
    pub sales_count: i64,
    /// Newest business day first.
    pub buckets: Vec<DailyBucket>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Groups sales by business day, oldest day first.
pub fn bucket_daily_totals(rows: &[SaleAmount], clock: &BusinessClock) -> Vec<DayTotal> {
    let mut days: BTreeMap<NaiveDate, (Money, i64)> = BTreeMap::new();

    for row in rows {
        let entry = days
            .entry(clock.business_day(row.created_at))
            .or_insert((Money::zero(), 0));
        entry.0 += row.total_amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(business_day, (total, sales_count))| DayTotal {
            business_day,
            total,
            sales_count,
        })
        .collect()
}

/// Trailing simple moving average over a chronological series.
///
/// ## Example
/// ```rust
/// use gastro_core::report::moving_average;
///
/// // window larger than history: averages what exists
/// assert_eq!(moving_average(&[10.0, 20.0, 30.0], 7), vec![10.0, 15.0, 20.0]);
/// assert_eq!(moving_average(&[10.0, 20.0, 30.0], 2), vec![10.0, 15.0, 25.0]);
/// ```
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut sum = 0.0;

    series
        .iter()
        .enumerate()
        .map(|(i, value)| {
            sum += value;
            if i >= window {
                sum -= series[i - window];
            }
            sum / (i + 1).min(window) as f64
        })
        .collect()
}

/// Percent change of each point against the previous one.
pub fn variation_percent(series: &[f64]) -> Vec<Option<f64>> {
    series
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let previous = *series.get(i.checked_sub(1)?)?;
            if previous == 0.0 {
                None
            } else {
                Some((value - previous) / previous * 100.0)
            }
        })
        .collect()
}

/// Builds the full report from the sales of the look-back range.
pub fn build_daily_report(
    rows: &[SaleAmount],
    clock: &BusinessClock,
    days: i64,
    window: usize,
) -> DailyReport {
    let totals = bucket_daily_totals(rows, clock);
    let series: Vec<f64> = totals.iter().map(|day| day.total.as_f64()).collect();
    let averages = moving_average(&series, window);
    let variations = variation_percent(&series);

    let mut buckets: Vec<DailyBucket> = totals
        .iter()
        .zip(averages)
        .zip(variations)
        .map(|((day, moving_average), variation_percent)| DailyBucket {
            business_day: day.business_day,
            weekday: weekday_label(day.business_day).to_string(),
            total: day.total,
            sales_count: day.sales_count,
            moving_average,
            variation_percent,
        })
        .collect();
    buckets.reverse();

    DailyReport {
        days,
        window,
        total: totals.iter().map(|day| day.total).sum(),
        sales_count: totals.iter().map(|day| day.sales_count).sum(),
        buckets,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn clock() -> BusinessClock {
        BusinessClock::new(FixedOffset::west_opt(5 * 3600).unwrap(), 6)
    }

    fn sale(clock: &BusinessClock, d: u32, h: u32, pesos: i64) -> SaleAmount {
        SaleAmount {
            created_at: clock
                .offset()
                .with_ymd_and_hms(2024, 6, d, h, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
            total_amount: Money::from_pesos(pesos),
        }
    }

    #[test]
    fn test_late_night_sales_join_previous_business_day() {
        let c = clock();
        let rows = vec![
            sale(&c, 9, 20, 50_000),
            sale(&c, 10, 2, 30_000),
            sale(&c, 10, 18, 40_000),
        ];

        let totals = bucket_daily_totals(&rows, &c);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].business_day, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(totals[0].total, Money::from_pesos(80_000));
        assert_eq!(totals[0].sales_count, 2);
        assert_eq!(totals[1].total, Money::from_pesos(40_000));
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        assert_eq!(moving_average(&[5.0, 7.0, 9.0], 1), vec![5.0, 7.0, 9.0]);
        assert!(moving_average(&[], 7).is_empty());
    }

    #[test]
    fn test_variation_percent() {
        let variations = variation_percent(&[100.0, 150.0, 0.0, 50.0]);
        assert_eq!(variations, vec![None, Some(50.0), Some(-100.0), None]);
    }

    #[test]
    fn test_report_is_newest_first() {
        let c = clock();
        let rows = vec![
            sale(&c, 7, 20, 100_000),
            sale(&c, 8, 20, 200_000),
            sale(&c, 9, 20, 150_000),
        ];

        let report = build_daily_report(&rows, &c, 30, 7);
        assert_eq!(report.total, Money::from_pesos(450_000));
        assert_eq!(report.sales_count, 3);

        let newest = &report.buckets[0];
        assert_eq!(newest.business_day, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(newest.weekday, "Domingo");
        assert_eq!(newest.moving_average, 150_000.0);
        assert_eq!(newest.variation_percent, Some(-25.0));

        let oldest = &report.buckets[2];
        assert_eq!(oldest.moving_average, 100_000.0);
        assert_eq!(oldest.variation_percent, None);
    }

    #[test]
    fn test_bucket_serializes_camel_case() {
        let bucket = DailyBucket {
            business_day: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            weekday: "Domingo".to_string(),
            total: Money::from_pesos(1_000),
            sales_count: 1,
            moving_average: 1_000.0,
            variation_percent: None,
        };
        let json = serde_json::to_value(&bucket).unwrap();
        assert_eq!(json["businessDay"], "2024-06-09");
        assert_eq!(json["salesCount"], 1);
        assert!(json["variationPercent"].is_null());
    }
}
