// src/lib.rs
//
// Real-time event scheduling engine for live-coded patterns.
//
// User code declares named voices (timbre + pattern); the scheduler turns
// them into absolutely timed trigger requests ahead of playback.

mod clock;
mod config;
mod diagnostics;
mod error;
mod note;
mod random;
mod registry;
mod scheduler;
mod sink;
mod timer;
mod voice;

pub mod pattern;

#[cfg(feature = "web")]
pub mod wasm;

#[cfg(test)]
mod test;

// Re-export key types for Rust consumers
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SchedulerConfig;
pub use diagnostics::{Diagnostics, LogDiagnostics};
pub use error::{EngineError, EngineResult, PatternError, PatternResult, SinkError, SinkResult};
pub use note::{Note, Span};
pub use pattern::{Pattern, PatternExt, chord, list};
pub use random::{RandomSource, Rng, ScriptedRandom};
pub use registry::VoiceRegistry;
pub use scheduler::{Scheduler, TickOutcome};
pub use sink::{AudioSink, LogSink, VoiceHandle};
pub use timer::{CancelHandle, RecurringTask};
pub use voice::{Timbre, Voice, VoiceId};
