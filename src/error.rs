// src/error.rs
//
// Error taxonomy for pattern evaluation, the audio sink and the scheduler.

use thiserror::Error;

/// Raised while evaluating a pattern for one cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    /// A leaf pattern holds a NaN or infinite frequency.
    #[error("frequency #{index} is not a finite number ({value})")]
    NonFiniteFrequency { index: usize, value: f64 },

    /// An injected random source returned an index outside `0..len`.
    #[error("random source picked index {index} out of {len} notes")]
    RandomIndexOutOfRange { index: usize, len: usize },

    /// Raised by user-supplied pattern implementations.
    #[error("{0}")]
    Custom(String),
}

/// Raised by the audio sink while handling a trigger request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SinkError {
    #[error("unsupported timbre '{0}'")]
    UnsupportedTimbre(String),

    #[error("audio sink rejected request: {0}")]
    Rejected(String),
}

/// Errors surfaced by the scheduler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A voice's pattern failed to produce its next cycle.
    #[error("voice '{voice}': pattern evaluation failed: {source}")]
    Pattern {
        voice: String,
        #[source]
        source: PatternError,
    },

    /// The sink failed while triggering one of a voice's notes.
    #[error("voice '{voice}': {source}")]
    Sink {
        voice: String,
        #[source]
        source: SinkError,
    },

    /// Muting or unmuting the master output failed.
    #[error("master gain: {0}")]
    Gain(#[source] SinkError),

    #[error("invalid tempo {0} (cycles per second must be finite and > 0)")]
    InvalidTempo(f64),
}

pub type PatternResult<T> = Result<T, PatternError>;
pub type SinkResult<T> = Result<T, SinkError>;
pub type EngineResult<T> = Result<T, EngineError>;
