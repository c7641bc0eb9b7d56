//! Recurrence rules and the next-occurrence calculator.
//!
//! Rules are a deliberately simple repetition model (not RFC 5545): a
//! frequency, an interval, an optional custom weekday set, and until/count
//! bounds. The calculator is a pure function: given the current occurrence
//! start it returns the next candidate, strictly later, with the
//! time-of-day preserved exactly.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// How an event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

fn default_interval() -> u32 {
    1
}

/// Repetition policy attached to an event definition.
///
/// With `Frequency::None` every other field is ignored: the event occurs
/// exactly once, at its own start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Frequency,

    /// Number of frequency units between occurrences (every 2 weeks, ...).
    #[serde(default = "default_interval")]
    pub interval: u32,

    /// Weekday ordinals (0=Sunday..6=Saturday); only read for `Custom`.
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,

    /// Anchor day for monthly rules; falls back to the series start's day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,

    /// Inclusive end of the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,

    /// Lifetime cap on occurrences, counted from the series start and
    /// independent of any query window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl RecurrenceRule {
    /// A rule for an event that does not repeat.
    pub fn once() -> Self {
        RecurrenceRule {
            frequency: Frequency::None,
            interval: 1,
            days_of_week: BTreeSet::new(),
            day_of_month: None,
            until: None,
            count: None,
        }
    }

    pub fn repeats(&self) -> bool {
        self.frequency != Frequency::None
    }

    /// Check rule invariants. Bad values are rejected, never coerced.
    pub fn validate(&self) -> EngineResult<()> {
        if self.frequency == Frequency::None {
            return Ok(());
        }

        if self.interval < 1 {
            return Err(EngineError::InvalidRule {
                field: "interval",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.count == Some(0) {
            return Err(EngineError::InvalidRule {
                field: "count",
                reason: "must be positive when present".to_string(),
            });
        }

        if self.frequency == Frequency::Custom {
            if self.days_of_week.is_empty() {
                return Err(EngineError::InvalidRule {
                    field: "daysOfWeek",
                    reason: "custom rules need at least one weekday".to_string(),
                });
            }
            if let Some(&day) = self.days_of_week.iter().find(|&&d| d > 6) {
                return Err(EngineError::InvalidRule {
                    field: "daysOfWeek",
                    reason: format!("{day} is not a weekday ordinal (0=Sunday..6=Saturday)"),
                });
            }
        }

        Ok(())
    }
}

/// Compute the next candidate start strictly after `current`.
///
/// `series_start` carries the anchor day for monthly rules: a clamped
/// occurrence (Feb 29 for a series anchored on the 31st) must not erode
/// the anchor, so March lands on the 31st again, not the 29th.
///
/// Only called with validated rules; one-shot rules never reach here.
pub fn next_occurrence(
    current: DateTime<Utc>,
    rule: &RecurrenceRule,
    series_start: DateTime<Utc>,
) -> DateTime<Utc> {
    match rule.frequency {
        Frequency::None => unreachable!("one-shot events never reach the calculator"),
        Frequency::Daily => current + Duration::days(i64::from(rule.interval)),
        Frequency::Weekly => current + Duration::days(7 * i64::from(rule.interval)),
        Frequency::Monthly => {
            let anchor = rule.day_of_month.unwrap_or(series_start.day());
            add_months_clamped(current, rule.interval, anchor)
        }
        Frequency::Custom => {
            debug_assert!(!rule.days_of_week.is_empty(), "rejected by validate()");
            let today = current.weekday().num_days_from_sunday() as u8;

            // Later configured weekday in the same Sunday-started week?
            if let Some(&next) = rule.days_of_week.iter().find(|&&d| d > today) {
                current + Duration::days(i64::from(next - today))
            } else {
                // Wrap to the first configured weekday, `interval` weeks on.
                // With a single-day set this is exactly 7*interval days;
                // the advance is never zero.
                let first = rule.days_of_week.first().copied().unwrap_or(today);
                let days =
                    7 * i64::from(rule.interval) - i64::from(today) + i64::from(first);
                current + Duration::days(days)
            }
        }
    }
}

/// Advance by whole months, pinning to `anchor_day` where the target month
/// has it and clamping to the month's last day otherwise.
fn add_months_clamped(current: DateTime<Utc>, months: u32, anchor_day: u32) -> DateTime<Utc> {
    let shifted = current
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(months)))
        .unwrap_or(current);
    let last = last_day_of_month(shifted.year(), shifted.month());
    shifted.with_day(anchor_day.min(last)).unwrap_or(shifted)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    for day in (28..=31).rev() {
        if NaiveDate::from_ymd_opt(year, month, day).is_some() {
            return day;
        }
    }
    28
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn daily(interval: u32) -> RecurrenceRule {
        RecurrenceRule {
            frequency: Frequency::Daily,
            interval,
            ..RecurrenceRule::once()
        }
    }

    fn custom(days: &[u8]) -> RecurrenceRule {
        RecurrenceRule {
            frequency: Frequency::Custom,
            interval: 1,
            days_of_week: days.iter().copied().collect(),
            ..RecurrenceRule::once()
        }
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let rule = daily(0);
        match rule.validate() {
            Err(EngineError::InvalidRule { field, .. }) => assert_eq!(field, "interval"),
            other => panic!("expected interval rejection, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_zero_count() {
        let mut rule = daily(1);
        rule.count = Some(0);
        match rule.validate() {
            Err(EngineError::InvalidRule { field, .. }) => assert_eq!(field, "count"),
            other => panic!("expected count rejection, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_custom_without_weekdays() {
        let rule = custom(&[]);
        match rule.validate() {
            Err(EngineError::InvalidRule { field, .. }) => assert_eq!(field, "daysOfWeek"),
            other => panic!("expected daysOfWeek rejection, got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_out_of_range_ordinal() {
        let rule = custom(&[1, 7]);
        match rule.validate() {
            Err(EngineError::InvalidRule { field, .. }) => assert_eq!(field, "daysOfWeek"),
            other => panic!("expected daysOfWeek rejection, got {:?}", other),
        }
    }

    #[test]
    fn validate_ignores_other_fields_for_one_shot() {
        let mut rule = RecurrenceRule::once();
        rule.interval = 0;
        rule.count = Some(0);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn daily_advances_by_interval_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        let next = next_occurrence(start, &daily(3), start);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 4, 9, 30, 0).unwrap());
    }

    #[test]
    fn weekly_advances_by_seven_interval_days() {
        let rule = RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 2,
            ..RecurrenceRule::once()
        };
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let next = next_occurrence(start, &rule, start);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn monthly_clamps_but_keeps_anchor() {
        let rule = RecurrenceRule {
            frequency: Frequency::Monthly,
            interval: 1,
            ..RecurrenceRule::once()
        };
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap();

        let feb = next_occurrence(start, &rule, start);
        assert_eq!(feb, Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap());

        // The clamped February date must not erode the 31st anchor.
        let mar = next_occurrence(feb, &rule, start);
        assert_eq!(mar, Utc.with_ymd_and_hms(2024, 3, 31, 10, 0, 0).unwrap());

        let apr = next_occurrence(mar, &rule, start);
        assert_eq!(apr, Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap());
    }

    #[test]
    fn monthly_honors_explicit_day_of_month() {
        let rule = RecurrenceRule {
            frequency: Frequency::Monthly,
            interval: 1,
            day_of_month: Some(15),
            ..RecurrenceRule::once()
        };
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let next = next_occurrence(start, &rule, start);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 2, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn custom_finds_later_weekday_in_same_week() {
        // 2024-01-01 is a Monday (ordinal 1).
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let next = next_occurrence(start, &custom(&[1, 3, 5]), start);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap());
    }

    #[test]
    fn custom_wraps_to_next_week() {
        // Friday (ordinal 5) wraps to Monday of the following week.
        let friday = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let next = next_occurrence(friday, &custom(&[1, 3, 5]), friday);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
    }

    #[test]
    fn custom_single_weekday_advances_full_weeks() {
        let mut rule = custom(&[1]);
        rule.interval = 2;
        let monday = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let next = next_occurrence(monday, &rule, monday);
        // Never a zero-length advance: exactly 7*interval days.
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn rule_deserializes_with_defaults() {
        let rule: RecurrenceRule = serde_json::from_str(r#"{"frequency":"weekly"}"#).unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 1);
        assert!(rule.days_of_week.is_empty());
        assert!(rule.until.is_none());
        assert!(rule.count.is_none());
    }
}
