//! Event definitions and derived occurrences.
//!
//! `EventDefinition` is the stored shape the CMS returns; `Occurrence` is
//! what expansion derives from it. Definitions are immutable snapshots as
//! far as the engine is concerned: expansion reads them and never writes
//! them back.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DURATION_MINUTES;
use crate::recurrence::RecurrenceRule;

/// What an event points at in the wider app, keyed by `eventType`.
///
/// Exactly one reference (or none, for personal and mood entries); invalid
/// combinations are unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventType", rename_all = "lowercase")]
pub enum EventKind {
    Personal,
    Mood,
    #[serde(rename_all = "camelCase")]
    Recipe { recipe_id: String },
    #[serde(rename_all = "camelCase")]
    Exercise { exercise_id: String },
    #[serde(rename_all = "camelCase")]
    Challenge { challenge_id: String },
    #[serde(rename_all = "camelCase")]
    Ritual { ritual_id: String },
}

impl EventKind {
    /// The `eventType` tag, for display layers.
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Personal => "personal",
            EventKind::Mood => "mood",
            EventKind::Recipe { .. } => "recipe",
            EventKind::Exercise { .. } => "exercise",
            EventKind::Challenge { .. } => "challenge",
            EventKind::Ritual { .. } => "ritual",
        }
    }
}

/// One stored calendar event, possibly recurring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,

    /// Absent end means a default one-hour duration for occurrence ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Display-only; expansion ignores it.
    #[serde(default)]
    pub all_day: bool,

    /// IANA zone name carried as opaque metadata for display layers;
    /// nothing in the engine interprets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    pub recurrence: RecurrenceRule,

    /// Calendar dates on which an otherwise-due occurrence is suppressed,
    /// regardless of the event's time-of-day.
    #[serde(default)]
    pub exceptions: BTreeSet<NaiveDate>,

    /// Series-level completion flag (completing one generated occurrence
    /// separately has no representation here).
    #[serde(default)]
    pub completed: bool,

    #[serde(flatten)]
    pub kind: EventKind,
}

impl EventDefinition {
    /// Duration applied to every occurrence of this definition.
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) if end > self.start_time => end - self.start_time,
            _ => Duration::minutes(DEFAULT_DURATION_MINUTES),
        }
    }

    /// Build the occurrence starting at `start`, offsetting the
    /// definition's duration onto the new start and copying the display
    /// fields as they are right now.
    pub fn occurrence_at(&self, start: DateTime<Utc>) -> Occurrence {
        Occurrence {
            id: format!("{}@{}", self.id, start.format("%Y%m%dT%H%M%SZ")),
            definition_id: self.id.clone(),
            title: self.title.clone(),
            start_time: start,
            end_time: start + self.duration(),
            all_day: self.all_day,
            timezone: self.timezone.clone(),
            completed: self.completed,
            kind: self.kind.clone(),
        }
    }
}

/// One concrete instance produced by expansion. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Synthetic id: definition id plus the occurrence's own start
    /// instant, so two occurrences of the same series never collide.
    pub id: String,
    pub definition_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub timezone: Option<String>,
    /// Snapshot of the series flag at generation time.
    pub completed: bool,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Frequency;
    use chrono::TimeZone;

    fn make_definition() -> EventDefinition {
        EventDefinition {
            id: "evt-42".to_string(),
            title: "Morning stretch".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap()),
            all_day: false,
            timezone: Some("Europe/Madrid".to_string()),
            recurrence: RecurrenceRule::once(),
            exceptions: BTreeSet::new(),
            completed: false,
            kind: EventKind::Exercise {
                exercise_id: "ex-7".to_string(),
            },
        }
    }

    #[test]
    fn occurrence_offsets_original_duration() {
        let def = make_definition();
        let start = Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap();
        let occ = def.occurrence_at(start);
        assert_eq!(occ.start_time, start);
        assert_eq!(occ.end_time, start + Duration::minutes(30));
    }

    #[test]
    fn occurrence_defaults_to_one_hour_without_end() {
        let mut def = make_definition();
        def.end_time = None;
        let occ = def.occurrence_at(def.start_time);
        assert_eq!(occ.end_time, def.start_time + Duration::hours(1));
    }

    #[test]
    fn occurrence_ids_never_collide_within_a_series() {
        let def = make_definition();
        let a = def.occurrence_at(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let b = def.occurrence_at(Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
        assert_eq!(a.id, "evt-42@20240101T090000Z");
        assert_ne!(a.id, b.id);
        assert_eq!(a.definition_id, b.definition_id);
    }

    #[test]
    fn definition_round_trips_cms_shape() {
        let json = r#"{
            "id": "evt-9",
            "title": "Batch-cook lentils",
            "startTime": "2024-03-04T18:00:00Z",
            "allDay": false,
            "recurrence": {"frequency": "weekly", "interval": 2},
            "exceptions": ["2024-03-18"],
            "eventType": "recipe",
            "recipeId": "rec-101"
        }"#;

        let def: EventDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.recurrence.frequency, Frequency::Weekly);
        assert_eq!(def.recurrence.interval, 2);
        assert!(def.end_time.is_none());
        assert!(
            def.exceptions
                .contains(&NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
        );
        assert_eq!(
            def.kind,
            EventKind::Recipe {
                recipe_id: "rec-101".to_string()
            }
        );

        // The tag and reference stay flattened on the way back out.
        let out = serde_json::to_value(&def).unwrap();
        assert_eq!(out["eventType"], "recipe");
        assert_eq!(out["recipeId"], "rec-101");
    }

    #[test]
    fn personal_events_carry_no_reference() {
        let json = r#"{
            "id": "evt-1",
            "title": "Journal",
            "startTime": "2024-03-04T08:00:00Z",
            "recurrence": {"frequency": "none"},
            "eventType": "personal"
        }"#;
        let def: EventDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.kind, EventKind::Personal);
        assert!(!def.completed);
        assert!(def.exceptions.is_empty());
    }
}
