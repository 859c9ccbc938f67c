//! Tone synthesis: the encoder side of the language.
//!
//! A program is rendered as back-to-back sine tones, one per frequency, each
//! lasting exactly one analysis interval.

use std::f64::consts::PI;

use log::debug;

use crate::params::SynthesisConfig;

/// A tone placed freely on a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Onset (seconds)
    pub start_s: f64,

    /// Pitch (Hz)
    pub frequency_hz: f64,

    /// Length (seconds)
    pub duration_s: f64,
}

/// Render one fixed-length tone per frequency, concatenated in order
pub fn render_program(frequencies: &[f64], config: &SynthesisConfig) -> Vec<f32> {
    let tone_samples = config.tone_samples();
    let mut output = vec![0.0; tone_samples * frequencies.len()];

    for (i, &hz) in frequencies.iter().enumerate() {
        add_tone(
            &mut output,
            i * tone_samples,
            tone_samples,
            hz,
            config.sample_rate_hz,
            config.amplitude,
        );
    }

    debug!(
        "rendered {} tones into {} samples ({:.2}s)",
        frequencies.len(),
        output.len(),
        output.len() as f64 / config.sample_rate_hz as f64
    );
    output
}

/// Mix freely placed tones into a silent track of `duration_s` seconds.
///
/// Overlapping tones add up; tones running past the end are cut off.
pub fn render_timeline(tones: &[Tone], duration_s: f64, config: &SynthesisConfig) -> Vec<f32> {
    let sample_rate = config.sample_rate_hz as f64;
    let mut output = vec![0.0; (duration_s * sample_rate) as usize];

    for tone in tones {
        let start = (tone.start_s * sample_rate) as usize;
        let samples = (tone.duration_s * sample_rate) as usize;
        add_tone(
            &mut output,
            start,
            samples,
            tone.frequency_hz,
            config.sample_rate_hz,
            config.amplitude,
        );
    }

    output
}

/// End of the last tone on a timeline (seconds)
pub fn timeline_end(tones: &[Tone]) -> f64 {
    tones
        .iter()
        .map(|tone| tone.start_s + tone.duration_s)
        .fold(0.0, f64::max)
}

/// Add a sine tone into `output` starting at sample `start`
pub fn add_tone(
    output: &mut [f32],
    start: usize,
    samples: usize,
    frequency_hz: f64,
    sample_rate_hz: u32,
    amplitude: f32,
) {
    let end = (start + samples).min(output.len());
    if start >= end {
        return;
    }

    let step = 2.0 * PI * frequency_hz / sample_rate_hz as f64;
    for (i, slot) in output[start..end].iter_mut().enumerate() {
        *slot += amplitude * (step * i as f64).sin() as f32;
    }
}

/// Scale so the loudest sample sits at full scale; silence is left alone
pub fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SynthesisConfig {
        SynthesisConfig {
            sample_rate_hz: 8000,
            tone_duration_s: 0.5,
            amplitude: 0.5,
        }
    }

    #[test]
    fn test_render_program_length_and_amplitude() {
        let samples = render_program(&[110.0, 432.0, 700.0], &config());

        assert_eq!(samples.len(), 3 * 4000);
        let peak = samples.iter().fold(0.0f32, |p, s| p.max(s.abs()));
        assert!(peak <= 0.5 + 1e-6);
        assert!(peak > 0.49);
    }

    #[test]
    fn test_each_tone_starts_at_zero_phase() {
        let samples = render_program(&[110.0, 432.0], &config());
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[4000], 0.0);
        assert!(samples[1] > 0.0);
        assert!(samples[4001] > 0.0);
    }

    #[test]
    fn test_render_timeline_mixes_and_clips() {
        let tones = [
            Tone {
                start_s: 0.0,
                frequency_hz: 110.0,
                duration_s: 1.0,
            },
            Tone {
                start_s: 0.5,
                frequency_hz: 220.0,
                duration_s: 10.0,
            },
        ];
        let samples = render_timeline(&tones, 2.0, &config());

        assert_eq!(samples.len(), 16000);
        assert_eq!(timeline_end(&tones), 10.5);
        // Overlap region can exceed a single tone's amplitude
        let overlap_peak = samples[4000..8000]
            .iter()
            .fold(0.0f32, |p, s| p.max(s.abs()));
        assert!(overlap_peak > 0.5);
    }

    #[test]
    fn test_add_tone_out_of_range_is_noop() {
        let mut output = vec![0.0; 10];
        add_tone(&mut output, 20, 5, 440.0, 8000, 0.5);
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_normalize() {
        let mut samples = vec![0.25, -0.5, 0.1];
        normalize(&mut samples);
        assert_eq!(samples, vec![0.5, -1.0, 0.2]);

        let mut silence = vec![0.0; 4];
        normalize(&mut silence);
        assert!(silence.iter().all(|&s| s == 0.0));
    }
}
