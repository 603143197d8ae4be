//! # Calendar Module
//!
//! Two notions of "day" used by the bar.
//!
//! ## Calendar Day vs Business Day
//! ```text
//!   local time   00:00        06:00                   24:00      06:00
//!                  │            │                        │          │
//!   calendar day   ├──── 2024-06-10 ─────────────────────┤ 06-11 ...
//!                  │            │                        │          │
//!   business day   ├─ 06-09 ───►├────────── 2024-06-10 ──┼─────────►┤
//!                  │ (late      │                        │ (still   │
//!                  │  night)    │                        │  06-10)  │
//! ```
//!
//! - **Calendar day**: plain local date. "Today's tickets" and one-time
//!   alerts use it.
//! - **Business day**: a shift that opens at `day_start_hour` (06:00 by
//!   default) and runs until the same hour the next morning. Daily sales
//!   reports use it so a 02:30 ticket counts toward the night it was served.
//!
//! All conversions go through a fixed UTC offset so the result never
//! depends on the host time zone.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc,
};

use crate::error::ValidationError;
use crate::DEFAULT_BUSINESS_DAY_START_HOUR;

/// Converts instants to local calendar and business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    offset: FixedOffset,
    day_start_hour: u32,
}

impl BusinessClock {
    /// Creates a clock. `day_start_hour` is clamped to 0..=23.
    pub fn new(offset: FixedOffset, day_start_hour: u32) -> Self {
        Self {
            offset,
            day_start_hour: day_start_hour.min(23),
        }
    }

    /// Parses an offset like `-05:00`, `+01:30` or `Z`.
    pub fn parse_offset(value: &str) -> Result<FixedOffset, ValidationError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
            return FixedOffset::east_opt(0)
                .ok_or_else(|| ValidationError::invalid_format("offset", "out of range"));
        }

        let invalid = || ValidationError::invalid_format("offset", "expected ±HH:MM");
        let (sign, rest) = if let Some(rest) = value.strip_prefix('+') {
            (1, rest)
        } else if let Some(rest) = value.strip_prefix('-') {
            (-1, rest)
        } else {
            return Err(invalid());
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 14 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_start_hour(&self) -> u32 {
        self.day_start_hour
    }

    /// Local wall-clock time of an instant.
    pub fn local(&self, ts: DateTime<Utc>) -> DateTime<FixedOffset> {
        ts.with_timezone(&self.offset)
    }

    /// Local calendar date of `ts`.
    pub fn calendar_day(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.local(ts).date_naive()
    }

    /// Business date of `ts`: before `day_start_hour` belongs to the
    /// previous date.
    pub fn business_day(&self, ts: DateTime<Utc>) -> NaiveDate {
        let local = self.local(ts);
        let date = local.date_naive();
        if local.hour() < self.day_start_hour {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// UTC bounds `[start, end)` of the local calendar day containing `now`.
    pub fn calendar_day_bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let day = self.calendar_day(now);
        let start = self.local_midnight(day).unwrap_or(now);
        (start, start + Duration::days(1))
    }

    fn local_midnight(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        let naive = day.and_hms_opt(0, 0, 0)?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Weekday number of the local calendar day, 0 = Sunday .. 6 = Saturday.
    pub fn weekday_number(&self, ts: DateTime<Utc>) -> u32 {
        self.local(ts).weekday().num_days_from_sunday()
    }
}

impl Default for BusinessClock {
    /// Colombia (UTC-05:00), business day opening at 06:00.
    fn default() -> Self {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap_or_else(|| Utc.fix());
        Self::new(offset, DEFAULT_BUSINESS_DAY_START_HOUR)
    }
}

/// Spanish weekday label of a date, as shown on the reports screen.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday().num_days_from_sunday() {
        0 => "Domingo",
        1 => "Lunes",
        2 => "Martes",
        3 => "Miércoles",
        4 => "Jueves",
        5 => "Viernes",
        _ => "Sábado",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> BusinessClock {
        BusinessClock::new(FixedOffset::west_opt(5 * 3600).unwrap(), 6)
    }

    fn local(clock: &BusinessClock, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        clock
            .offset()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_business_day_rolls_over_at_start_hour() {
        let c = clock();
        assert_eq!(c.business_day(local(&c, 2024, 6, 10, 2, 30)), date(2024, 6, 9));
        assert_eq!(c.business_day(local(&c, 2024, 6, 10, 5, 59)), date(2024, 6, 9));
        assert_eq!(c.business_day(local(&c, 2024, 6, 10, 6, 0)), date(2024, 6, 10));
        assert_eq!(c.business_day(local(&c, 2024, 6, 10, 15, 0)), date(2024, 6, 10));
        assert_eq!(c.business_day(local(&c, 2024, 6, 10, 23, 59)), date(2024, 6, 10));
    }

    #[test]
    fn test_calendar_day_ignores_start_hour() {
        let c = clock();
        assert_eq!(c.calendar_day(local(&c, 2024, 6, 10, 2, 30)), date(2024, 6, 10));
    }

    #[test]
    fn test_business_day_uses_offset_not_utc() {
        let c = clock();
        // 04:00 UTC is 23:00 local the previous evening
        let ts = Utc.with_ymd_and_hms(2024, 6, 11, 4, 0, 0).unwrap();
        assert_eq!(c.business_day(ts), date(2024, 6, 10));
        assert_eq!(c.calendar_day(ts), date(2024, 6, 10));
    }

    #[test]
    fn test_calendar_day_bounds() {
        let c = clock();
        let (start, end) = c.calendar_day_bounds(local(&c, 2024, 6, 10, 14, 0));
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 10, 5, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 11, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_weekday_number_starts_on_sunday() {
        let c = clock();
        // 2024-06-09 was a Sunday, 2024-06-12 a Wednesday
        assert_eq!(c.weekday_number(local(&c, 2024, 6, 9, 12, 0)), 0);
        assert_eq!(c.weekday_number(local(&c, 2024, 6, 12, 12, 0)), 3);
        assert_eq!(weekday_label(date(2024, 6, 12)), "Miércoles");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(
            BusinessClock::parse_offset("-05:00").unwrap(),
            FixedOffset::west_opt(5 * 3600).unwrap()
        );
        assert_eq!(
            BusinessClock::parse_offset("+01:30").unwrap(),
            FixedOffset::east_opt(5400).unwrap()
        );
        assert_eq!(BusinessClock::parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(BusinessClock::parse_offset("05:00").is_err());
        assert!(BusinessClock::parse_offset("-25:00").is_err());
    }

    #[test]
    fn test_default_clock() {
        let c = BusinessClock::default();
        assert_eq!(c.day_start_hour(), 6);
        assert_eq!(c.offset().local_minus_utc(), -5 * 3600);
    }
}
