//! Occurrence queries over the external event store.
//!
//! The thin orchestration layer: fetch candidate definitions for a user,
//! expand each, merge and sort. The store only needs coarse
//! over-selection; all precise filtering happens in `expand`.

use crate::date_range::DateRange;
use crate::error::EngineResult;
use crate::event::EventDefinition;
use crate::expand::{Expansion, expand};

/// Read access to stored event definitions.
///
/// Implementations over-select: anything that might produce an occurrence
/// inside the range must come back; extra definitions are harmless and
/// get filtered out during expansion.
#[allow(async_fn_in_trait)]
pub trait EventStore {
    async fn fetch_definitions(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> EngineResult<Vec<EventDefinition>>;
}

/// Orchestrates fetch + expansion for one user's calendar. Read-only:
/// stored definitions are never mutated here.
pub struct EventQueryService<S> {
    store: S,
}

impl<S: EventStore> EventQueryService<S> {
    pub fn new(store: S) -> Self {
        EventQueryService { store }
    }

    /// All occurrences for `user_id` within the inclusive window, sorted
    /// by start time (definition id breaks ties). A store failure
    /// surfaces as the error it is, never as an empty list.
    pub async fn list_occurrences(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> EngineResult<Expansion> {
        let definitions = self.store.fetch_definitions(user_id, range).await?;

        let mut merged = Expansion::default();
        for definition in &definitions {
            if !is_candidate(definition, range) {
                continue;
            }
            let expansion = expand(definition, range.from, range.to)?;
            merged.truncated |= expansion.truncated;
            merged.occurrences.extend(expansion.occurrences);
        }

        merged.occurrences.sort_by(|a, b| {
            (a.start_time, &a.definition_id).cmp(&(b.start_time, &b.definition_id))
        });
        Ok(merged)
    }
}

/// The over-selection predicate from the query contract: one-shot events
/// must start inside the window; recurring definitions qualify unless
/// their `until` already passed before the window opened.
fn is_candidate(definition: &EventDefinition, range: &DateRange) -> bool {
    if definition.recurrence.repeats() {
        match definition.recurrence.until {
            Some(until) => until >= range.from,
            None => true,
        }
    } else {
        definition.start_time >= range.from && definition.start_time <= range.to
    }
}
