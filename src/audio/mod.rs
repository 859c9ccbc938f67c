//! Audio side of the language: spectral decoding, tone synthesis and WAV I/O.
//!
//! The extractor reports one dominant frequency per fixed analysis interval;
//! the synthesizer renders a frequency list as one tone per interval, so the
//! two are inverses of each other.

mod fft;
mod synthesis;
mod wav;

// Re-export public types
pub use fft::{hann_window, Frequencies, Frequency, FrequencyExtractor};
pub use synthesis::{add_tone, normalize, render_program, render_timeline, timeline_end, Tone};
pub use wav::{read_wav, read_wav_from, write_wav, write_wav_to, DecodedAudio, OutputFormat};
