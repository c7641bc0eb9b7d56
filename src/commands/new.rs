use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use owo_colors::OwoColorize;
use ritmo_core::config::RitmoConfig;
use ritmo_core::event::{EventDefinition, EventKind};
use ritmo_core::recurrence::{Frequency, RecurrenceRule};
use ritmo_core::store::StoreClient;
use uuid::Uuid;

pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub repeat: Option<String>,
    pub every: u32,
    pub days: Option<String>,
    pub until: Option<String>,
}

pub async fn run(config: &RitmoConfig, args: NewEvent) -> Result<()> {
    let start_time = parse_datetime(&args.start)?;
    let end_time = args.end.as_deref().map(parse_datetime).transpose()?;

    let recurrence = build_rule(&args)?;
    // Reject bad rules before talking to the CMS.
    recurrence.validate()?;

    let definition = EventDefinition {
        id: Uuid::new_v4().to_string(),
        title: args.title,
        start_time,
        end_time,
        all_day: false,
        timezone: None,
        recurrence,
        exceptions: BTreeSet::new(),
        completed: false,
        kind: EventKind::Personal,
    };

    let store = StoreClient::new(&config.api_url)?;
    let created = store.create_event(&config.user_id, &definition).await?;

    println!("Created {} ({})", created.title.bold(), created.id.dimmed());
    Ok(())
}

fn build_rule(args: &NewEvent) -> Result<RecurrenceRule> {
    let frequency = match args.repeat.as_deref() {
        None => return Ok(RecurrenceRule::once()),
        Some("daily") => Frequency::Daily,
        Some("weekly") => Frequency::Weekly,
        Some("monthly") => Frequency::Monthly,
        Some("custom") => Frequency::Custom,
        Some(other) => anyhow::bail!(
            "Unknown repeat '{}'. Use daily, weekly, monthly or custom",
            other
        ),
    };

    let days_of_week: BTreeSet<u8> = match &args.days {
        Some(list) => list
            .split(',')
            .map(|d| {
                d.trim()
                    .parse::<u8>()
                    .with_context(|| format!("Invalid weekday ordinal '{}'", d.trim()))
            })
            .collect::<Result<_>>()?,
        None => BTreeSet::new(),
    };

    let until = args.until.as_deref().map(parse_until).transpose()?;

    Ok(RecurrenceRule {
        frequency,
        interval: args.every,
        days_of_week,
        day_of_month: None,
        until,
        count: None,
    })
}

/// Accept "YYYY-MM-DDTHH:MM" or a bare "YYYY-MM-DD" (midnight).
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid date/time '{}'. Expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
            s
        )
    })?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// An until date closes at the end of its day.
fn parse_until(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(23, 59, 59).unwrap().and_utc())
}
