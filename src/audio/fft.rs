//! Windowed FFT analysis: one dominant frequency per interval.

use std::f32::consts::PI;
use std::sync::Arc;

use log::{debug, trace};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::ConfigError;
use crate::params::{AnalysisConfig, TailPolicy, WindowFunction};

/// Dominant frequency of one analysis window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency {
    /// Peak frequency (Hz)
    pub hz: f64,

    /// Window number, counted from 0
    pub index: usize,

    /// Window start (seconds)
    pub start_s: f64,

    /// Window end (seconds); past the stream end for a padded tail
    pub end_s: f64,
}

/// Splits a sample stream into intervals and finds each interval's peak
pub struct FrequencyExtractor {
    config: AnalysisConfig,
    window_samples: usize,
    fft: Arc<dyn Fft<f32>>,
    weights: Vec<f32>,
}

impl FrequencyExtractor {
    /// Plan the FFT for the configured window length
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let window_samples = config.window_samples();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(window_samples);
        let weights = (0..window_samples)
            .map(|i| match config.window {
                WindowFunction::Rectangular => 1.0,
                WindowFunction::Hann => hann_window(i, window_samples),
            })
            .collect();

        debug!(
            "analysis: {} samples per window, {:.3} Hz per bin",
            window_samples,
            config.bin_width_hz()
        );

        Ok(Self {
            config,
            window_samples,
            fft,
            weights,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Lazily analyse `samples`; call again to restart from the beginning
    pub fn frequencies<'a>(&'a self, samples: &'a [f32]) -> Frequencies<'a> {
        Frequencies {
            extractor: self,
            samples,
            offset: 0,
            index: 0,
            buffer: vec![Complex::new(0.0, 0.0); self.window_samples],
        }
    }

    /// Analyse the whole stream at once
    pub fn extract(&self, samples: &[f32]) -> Vec<Frequency> {
        self.frequencies(samples).collect()
    }

    /// Peak frequency of one window; shorter input is zero-padded
    pub fn dominant_frequency(&self, window: &[f32]) -> f64 {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.window_samples];
        self.peak(window, &mut buffer)
    }

    fn peak(&self, window: &[f32], buffer: &mut [Complex<f32>]) -> f64 {
        // Apply window weights, zero-padding the remainder
        for (i, slot) in buffer.iter_mut().enumerate() {
            let sample = window.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.weights[i], 0.0);
        }

        self.fft.process(buffer);

        // Positive-frequency half only; ties keep the lowest bin
        let (bin, _) = buffer[..self.window_samples / 2]
            .iter()
            .map(|c| c.norm())
            .enumerate()
            .fold((0, f32::MIN), |best, (bin, magnitude)| {
                if magnitude > best.1 {
                    (bin, magnitude)
                } else {
                    best
                }
            });

        self.config.bin_to_hz(bin)
    }
}

/// Iterator over the dominant frequency of each window
pub struct Frequencies<'a> {
    extractor: &'a FrequencyExtractor,
    samples: &'a [f32],
    offset: usize,
    index: usize,
    buffer: Vec<Complex<f32>>,
}

impl Iterator for Frequencies<'_> {
    type Item = Frequency;

    fn next(&mut self) -> Option<Frequency> {
        let window_samples = self.extractor.window_samples;
        let remaining = self.samples.len().saturating_sub(self.offset);
        if remaining == 0 {
            return None;
        }

        if remaining < window_samples && self.extractor.config.tail == TailPolicy::Drop {
            debug!("dropping trailing partial window of {} samples", remaining);
            self.offset = self.samples.len();
            return None;
        }

        let end = (self.offset + window_samples).min(self.samples.len());
        let hz = self
            .extractor
            .peak(&self.samples[self.offset..end], &mut self.buffer);

        let sample_rate = self.extractor.config.sample_rate_hz as f64;
        let frequency = Frequency {
            hz,
            index: self.index,
            start_s: self.offset as f64 / sample_rate,
            end_s: (self.offset + window_samples) as f64 / sample_rate,
        };
        trace!(
            "window {} ({:.2}-{:.2}s): {:.2} Hz",
            frequency.index,
            frequency.start_s,
            frequency.end_s,
            frequency.hz
        );

        self.offset += window_samples;
        self.index += 1;
        Some(frequency)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let window_samples = self.extractor.window_samples;
        let remaining = self.samples.len().saturating_sub(self.offset);
        let count = match self.extractor.config.tail {
            TailPolicy::Drop => remaining / window_samples,
            TailPolicy::Pad => remaining.div_ceil(window_samples),
        };
        (count, Some(count))
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
