//! Core engine for the ritmo wellness calendar.
//!
//! This crate holds everything behind the calendar surface of the app:
//! - `event` / `recurrence`: the stored event model and its repetition rules
//! - `expand`: expansion of one (possibly recurring) definition into
//!   concrete occurrences within a requested window
//! - `service`: occurrence queries over the external event store
//! - `store`: HTTP client for the CMS event endpoints

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod expand;
pub mod recurrence;
pub mod service;
pub mod store;

pub use error::{EngineError, EngineResult};
pub use event::{EventDefinition, EventKind, Occurrence};
pub use expand::{Expansion, expand};
pub use recurrence::{Frequency, RecurrenceRule};
