//! musolang library - a programming language written in sine tones
//!
//! Audio is cut into fixed intervals, each interval's dominant frequency
//! becomes a symbol, and the symbols are parsed and executed as a program.

pub mod audio;
pub mod cli;
pub mod error;
pub mod lang;
pub mod params;
pub mod pipeline;
pub mod source;

pub use error::{Error, Result};
