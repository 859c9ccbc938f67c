//! Error types for every stage of the decode-and-execute pipeline.
//!
//! Each stage owns a narrow error enum; [`Error`] collects them for callers
//! that drive the whole pipeline.

use thiserror::Error;

use crate::lang::{Action, VarId};

/// Library-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by the pipeline entry points
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("parse error: {0}")]
    Parse(ParseError),

    #[error("binding error: {0}")]
    Binding(#[from] BindingError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        // Bindings happen while parsing but are reported as their own kind
        match err {
            ParseError::Binding(binding) => Error::Binding(binding),
            other => Error::Parse(other),
        }
    }
}

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error("interval must be a positive number of seconds, got {0}")]
    BadInterval(f64),

    #[error(
        "interval of {interval_s}s at {sample_rate_hz} Hz exceeds the {max_samples}-sample window limit"
    )]
    WindowTooLong {
        interval_s: f64,
        sample_rate_hz: u32,
        max_samples: usize,
    },

    #[error("interval of {interval_s}s at {sample_rate_hz} Hz is shorter than two samples")]
    WindowTooShort { interval_s: f64, sample_rate_hz: u32 },

    #[error("action tolerance must be in [0, {max}) Hz, got {got}")]
    BadTolerance { got: f64, max: f64 },

    #[error("amplitude must be in (0, 1], got {0}")]
    BadAmplitude(f32),
}

/// WAV input/output failures
#[derive(Debug, Error)]
pub enum AudioError {
    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format: {bits} bits {format:?}")]
    UnsupportedFormat { bits: u16, format: hound::SampleFormat },

    #[error("nothing to encode: the frequency list is empty")]
    EmptySignal,
}

/// Malformed frequency-list or timeline sources
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("line {line}, column {column}: '{token}' is not a frequency")]
    BadFrequency {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("line {line}: expected 3 fields (start, frequency, duration), got {got}")]
    FieldCount { line: usize, got: usize },

    #[error("line {line}: '{field}' is not a real number")]
    BadField { line: usize, field: String },

    #[error("line {line}: values must be finite and non-negative")]
    OutOfRange { line: usize },
}

/// Structural problems found while turning symbols into instructions.
///
/// `position` is the index of the offending symbol in the classified stream;
/// `at_s` is the start of its analysis window when the stream came from audio.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(
        "{action} at symbol {position}{} needs {required} argument(s), found {found}",
        fmt_at(.at_s)
    )]
    Truncated {
        action: Action,
        position: usize,
        at_s: Option<f64>,
        required: usize,
        found: usize,
    },

    #[error("{action} opened at symbol {position}{} is never closed", fmt_at(.at_s))]
    Unterminated {
        action: Action,
        position: usize,
        at_s: Option<f64>,
    },

    #[error("{value} Hz at symbol {position} is not a Unicode scalar value")]
    InvalidCodePoint { value: u32, position: usize },

    #[error(transparent)]
    Binding(#[from] BindingError),
}

fn fmt_at(at_s: &Option<f64>) -> String {
    match at_s {
        Some(t) => format!(" ({:.2}s)", t),
        None => String::new(),
    }
}

/// A Function-Define targeted a variable that already holds a written value
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot bind a function to variable {0}: it is already initialized")]
pub struct BindingError(pub VarId);

/// A fatal failure while executing an instruction.
///
/// `index` is the instruction's position within the sequence being executed
/// and `depth` counts the function bodies inlined around it (0 = top level).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("instruction {index} ({action}, depth {depth}): {kind}")]
pub struct RuntimeError {
    pub index: usize,
    pub depth: usize,
    pub action: Action,
    pub kind: RuntimeErrorKind,
}

/// What went wrong inside a [`RuntimeError`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("type error: {0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("console error: {0}")]
    Console(String),

    #[error("input channel closed")]
    InputClosed,

    #[error("interrupted")]
    Interrupted,
}
