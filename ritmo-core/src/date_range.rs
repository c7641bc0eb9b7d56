//! Expansion window for occurrence queries.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::constants::DEFAULT_AGENDA_DAYS;

/// Inclusive `[from, to]` instant range for which occurrences are
/// requested.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Default for DateRange {
    /// Default agenda window: now to +DEFAULT_AGENDA_DAYS.
    fn default() -> Self {
        let now = Utc::now();
        DateRange {
            from: now,
            to: now + Duration::days(DEFAULT_AGENDA_DAYS),
        }
    }
}

impl DateRange {
    /// Parse date arguments into a window.
    /// - `from`: YYYY-MM-DD, opens at start of day; defaults to now
    /// - `to`: YYYY-MM-DD, closes at end of day; defaults to
    ///   +DEFAULT_AGENDA_DAYS
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let now = Utc::now();

        let from_dt = match from {
            Some(s) => parse_date_start(s)?,
            None => now,
        };

        let to_dt = match to {
            Some(s) => parse_date_end(s)?,
            None => now + Duration::days(DEFAULT_AGENDA_DAYS),
        };

        if to_dt < from_dt {
            return Err(format!(
                "Window end {} is before its start {}",
                to_dt.date_naive(),
                from_dt.date_naive()
            ));
        }

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(23, 59, 59).unwrap().and_utc())
}
