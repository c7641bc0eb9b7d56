//! Shared constants for the ritmo engine.

/// Hard ceiling on candidates walked in one expansion. A rule/window
/// combination that would keep going (a daily rule over a multi-year
/// window, say) stops here and flags the result as truncated.
pub const MAX_EXPANSION_ITERATIONS: u32 = 365;

/// Duration assumed for definitions without an explicit end time.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Default agenda window length in days.
pub const DEFAULT_AGENDA_DAYS: i64 = 30;
