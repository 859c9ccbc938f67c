//! WAV file input and output.

use std::io::{Read, Seek, Write};
use std::path::Path;

use log::{debug, info};

use super::synthesis::normalize;
use crate::error::AudioError;

/// Mono samples in [-1, 1] with their sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

impl DecodedAudio {
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }
}

/// Sample encoding of written files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 16-bit integer PCM
    #[default]
    Pcm16,
    /// 32-bit IEEE float
    Float32,
}

/// Read a WAV file, mixing all channels down to mono
pub fn read_wav(path: impl AsRef<Path>) -> Result<DecodedAudio, AudioError> {
    let path = path.as_ref();
    let reader = hound::WavReader::open(path)?;
    let audio = decode(reader)?;
    info!(
        "{}: {} samples @ {} Hz ({:.2}s)",
        path.display(),
        audio.samples.len(),
        audio.sample_rate_hz,
        audio.duration_s()
    );
    Ok(audio)
}

/// Read WAV data from any byte source
pub fn read_wav_from<R: Read>(source: R) -> Result<DecodedAudio, AudioError> {
    decode(hound::WavReader::new(source)?)
}

fn decode<R: Read>(reader: hound::WavReader<R>) -> Result<DecodedAudio, AudioError> {
    let spec = reader.spec();
    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        (hound::SampleFormat::Int, bits @ 8..=32) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|s| s as f32 * scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => return Err(AudioError::UnsupportedFormat { bits, format }),
    };

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };
    debug!(
        "decoded {} channel(s), {} bits {:?}",
        channels, spec.bits_per_sample, spec.sample_format
    );

    Ok(DecodedAudio {
        samples,
        sample_rate_hz: spec.sample_rate,
    })
}

/// Write mono samples to a WAV file, normalised to full scale
pub fn write_wav(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate_hz: u32,
    format: OutputFormat,
) -> Result<(), AudioError> {
    let path = path.as_ref();
    let writer = hound::WavWriter::create(path, spec(sample_rate_hz, format))?;
    encode(writer, samples, format)?;
    info!(
        "wrote {} samples @ {} Hz to {}",
        samples.len(),
        sample_rate_hz,
        path.display()
    );
    Ok(())
}

/// Write mono samples as WAV data into any seekable sink
pub fn write_wav_to<W: Write + Seek>(
    sink: W,
    samples: &[f32],
    sample_rate_hz: u32,
    format: OutputFormat,
) -> Result<(), AudioError> {
    let writer = hound::WavWriter::new(sink, spec(sample_rate_hz, format))?;
    encode(writer, samples, format)
}

fn spec(sample_rate_hz: u32, format: OutputFormat) -> hound::WavSpec {
    let (bits_per_sample, sample_format) = match format {
        OutputFormat::Pcm16 => (16, hound::SampleFormat::Int),
        OutputFormat::Float32 => (32, hound::SampleFormat::Float),
    };
    hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample,
        sample_format,
    }
}

fn encode<W: Write + Seek>(
    mut writer: hound::WavWriter<W>,
    samples: &[f32],
    format: OutputFormat,
) -> Result<(), AudioError> {
    // Normalize to avoid clipping
    let mut normalized = samples.to_vec();
    normalize(&mut normalized);

    for &sample in &normalized {
        match format {
            OutputFormat::Pcm16 => writer.write_sample((sample * i16::MAX as f32) as i16)?,
            OutputFormat::Float32 => writer.write_sample(sample)?,
        }
    }
    writer.finalize()?;
    Ok(())
}
