//! Occurrence expansion for (possibly recurring) event definitions.
//!
//! Expands one definition into the concrete occurrences falling inside an
//! inclusive `[range_start, range_end]` window, honoring exception dates
//! and until/count bounds. Pure and restartable: the next candidate is
//! threaded through a local accumulator, no cursor survives a call.

use chrono::{DateTime, Utc};

use crate::constants::MAX_EXPANSION_ITERATIONS;
use crate::error::EngineResult;
use crate::event::{EventDefinition, Occurrence};
use crate::recurrence::next_occurrence;

/// Result of expanding one definition (or a merged set of them).
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    /// Occurrences ascending by start time.
    pub occurrences: Vec<Occurrence>,
    /// True when the safety ceiling cut the walk short. The partial
    /// result is still correctly ordered; callers narrow the window and
    /// re-query.
    pub truncated: bool,
}

/// Expand `definition` into the occurrences within `[range_start,
/// range_end]` (inclusive on both ends).
///
/// The rule's `count` bounds the series globally: candidates are counted
/// from the definition's own start, and a candidate suppressed by an
/// exception date still consumes count. A `count=5` series created long
/// before the window may therefore correctly produce nothing.
///
/// Comparisons are instant comparisons except `exceptions`, which match
/// by calendar date and suppress the whole day.
pub fn expand(
    definition: &EventDefinition,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> EngineResult<Expansion> {
    let rule = &definition.recurrence;
    rule.validate()?;

    if !rule.repeats() {
        let start = definition.start_time;
        let occurrences = if start >= range_start && start <= range_end {
            vec![definition.occurrence_at(start)]
        } else {
            Vec::new()
        };
        return Ok(Expansion {
            occurrences,
            truncated: false,
        });
    }

    let mut occurrences = Vec::new();
    let mut truncated = false;
    let mut candidate = definition.start_time;
    // Emitted-or-suppressed candidates since the series start.
    let mut considered: u32 = 0;

    loop {
        if candidate > range_end {
            break;
        }
        if let Some(until) = rule.until {
            if candidate > until {
                break;
            }
        }
        if let Some(count) = rule.count {
            if considered >= count {
                break;
            }
        }

        considered += 1;
        if candidate >= range_start && !definition.exceptions.contains(&candidate.date_naive()) {
            occurrences.push(definition.occurrence_at(candidate));
        }

        if considered >= MAX_EXPANSION_ITERATIONS {
            // Flag only a genuine cut: a walk whose next candidate would
            // still have been due.
            let next = next_occurrence(candidate, rule, definition.start_time);
            truncated = next <= range_end
                && rule.until.map_or(true, |until| next <= until)
                && rule.count.map_or(true, |count| considered < count);
            break;
        }
        candidate = next_occurrence(candidate, rule, definition.start_time);
    }

    // Candidates strictly increase, so the vec is already time-sorted.
    Ok(Expansion {
        occurrences,
        truncated,
    })
}
