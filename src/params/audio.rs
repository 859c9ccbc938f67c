//! Audio analysis and synthesis configuration.

use crate::error::ConfigError;

/// How the extractor treats a trailing window shorter than the interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TailPolicy {
    /// Discard the partial window (no frequency is reported for it)
    #[default]
    Drop,
    /// Zero-pad the partial window to full length and analyse it
    Pad,
}

/// Weighting applied to each window before the FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// No weighting: plain DFT peak picking
    #[default]
    Rectangular,
    /// Hann taper, trades bin sharpness for lower leakage
    Hann,
}

/// Spectral analysis configuration for decoding a program
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Sample rate of the analysed stream (Hz)
    pub sample_rate_hz: u32,

    /// Analysis window length (seconds)
    /// Frequency resolution is 1 / interval_s Hz, so 1.0 s gives 1 Hz bins
    pub interval_s: f64,

    /// Trailing partial window handling
    pub tail: TailPolicy,

    /// Window weighting
    pub window: WindowFunction,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::DEFAULT_SAMPLE_RATE_HZ,
            interval_s: audio_constants::DEFAULT_INTERVAL_S,
            tail: TailPolicy::default(),
            window: WindowFunction::default(),
        }
    }
}

impl AnalysisConfig {
    /// Analysis config for a stream at `sample_rate_hz` with `interval_s` windows
    pub fn new(sample_rate_hz: u32, interval_s: f64) -> Self {
        Self {
            sample_rate_hz,
            interval_s,
            ..Self::default()
        }
    }

    /// Window length in samples
    pub fn window_samples(&self) -> usize {
        (self.interval_s * self.sample_rate_hz as f64) as usize
    }

    /// Width of one FFT bin (Hz)
    pub fn bin_width_hz(&self) -> f64 {
        self.sample_rate_hz as f64 / self.window_samples() as f64
    }

    /// Convert FFT bin index to frequency (Hz)
    pub fn bin_to_hz(&self, bin: usize) -> f64 {
        bin as f64 * self.bin_width_hz()
    }

    /// Convert frequency (Hz) to the nearest FFT bin index
    pub fn hz_to_bin(&self, hz: f64) -> usize {
        (hz / self.bin_width_hz()).round() as usize
    }

    /// Validate configuration (positive interval, at least two samples per window)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !(self.interval_s.is_finite() && self.interval_s > 0.0) {
            return Err(ConfigError::BadInterval(self.interval_s));
        }
        let samples = self.interval_s * self.sample_rate_hz as f64;
        if samples > audio_constants::MAX_WINDOW_SAMPLES as f64 {
            return Err(ConfigError::WindowTooLong {
                interval_s: self.interval_s,
                sample_rate_hz: self.sample_rate_hz,
                max_samples: audio_constants::MAX_WINDOW_SAMPLES,
            });
        }
        if self.window_samples() < 2 {
            return Err(ConfigError::WindowTooShort {
                interval_s: self.interval_s,
                sample_rate_hz: self.sample_rate_hz,
            });
        }
        Ok(())
    }
}

/// Tone synthesis configuration for encoding a program
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// Output sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Duration of each tone (seconds); must match the decoder's interval
    pub tone_duration_s: f64,

    /// Peak amplitude of each tone, in (0, 1]
    pub amplitude: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::DEFAULT_SAMPLE_RATE_HZ,
            tone_duration_s: audio_constants::DEFAULT_INTERVAL_S,
            amplitude: audio_constants::DEFAULT_AMPLITUDE,
        }
    }
}

impl SynthesisConfig {
    /// Samples per tone
    pub fn tone_samples(&self) -> usize {
        (self.tone_duration_s * self.sample_rate_hz as f64) as usize
    }

    /// The analysis config that inverts this synthesis
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig::new(self.sample_rate_hz, self.tone_duration_s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !(self.tone_duration_s.is_finite() && self.tone_duration_s > 0.0) {
            return Err(ConfigError::BadInterval(self.tone_duration_s));
        }
        let samples = self.tone_duration_s * self.sample_rate_hz as f64;
        if samples > audio_constants::MAX_WINDOW_SAMPLES as f64 {
            return Err(ConfigError::WindowTooLong {
                interval_s: self.tone_duration_s,
                sample_rate_hz: self.sample_rate_hz,
                max_samples: audio_constants::MAX_WINDOW_SAMPLES,
            });
        }
        if !(self.amplitude > 0.0 && self.amplitude <= 1.0) {
            return Err(ConfigError::BadAmplitude(self.amplitude));
        }
        Ok(())
    }
}

/// Audio defaults shared by the encoder and the decoder
pub mod audio_constants {
    /// CD-quality sample rate (Hz)
    pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44100;

    /// One symbol per second (= 1 Hz analysis resolution)
    pub const DEFAULT_INTERVAL_S: f64 = 1.0;

    /// Tone amplitude before normalisation
    pub const DEFAULT_AMPLITUDE: f32 = 0.5;

    /// Longest analysis window / tone (samples), about 6 minutes at 44.1 kHz
    pub const MAX_WINDOW_SAMPLES: usize = 1 << 24;
}
