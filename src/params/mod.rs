//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable of the pipeline lives here with:
//! - Physical units (seconds, Hz, samples)
//! - Documented defaults and valid ranges
//! - A `validate()` that rejects values the pipeline cannot honour

mod audio;
mod lang;

// Re-export all types
pub use audio::{audio_constants, AnalysisConfig, SynthesisConfig, TailPolicy, WindowFunction};
pub use lang::ClassifierConfig;
