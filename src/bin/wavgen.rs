//! wavgen - render a frequency list as a WAV file of sine tones
//!
//! The default mode writes one tone per listed frequency, back to back, each
//! lasting one interval. `--timeline` instead places tones freely from
//! `start,frequency,duration` rows.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use musolang::audio::{render_program, render_timeline, timeline_end, write_wav};
use musolang::cli::EncodeArgs;
use musolang::error::AudioError;
use musolang::source::{parse_frequency_list, parse_timeline};

fn main() -> Result<()> {
    env_logger::init();
    let args = EncodeArgs::parse();

    let config = args.synthesis_config();
    config.validate()?;

    let text = fs::read_to_string(&args.freqs)
        .with_context(|| format!("failed to read {}", args.freqs.display()))?;

    let samples = if args.timeline {
        let tones = parse_timeline(&text, args.skip_header)
            .with_context(|| format!("invalid timeline {}", args.freqs.display()))?;
        if tones.is_empty() {
            return Err(AudioError::EmptySignal.into());
        }
        let duration_s = args.duration.unwrap_or_else(|| timeline_end(&tones));
        info!("{} tones over {:.2}s", tones.len(), duration_s);
        render_timeline(&tones, duration_s, &config)
    } else {
        let frequencies = parse_frequency_list(&text)
            .with_context(|| format!("invalid frequency list {}", args.freqs.display()))?;
        if frequencies.is_empty() {
            return Err(AudioError::EmptySignal.into());
        }
        info!("{} tones of {}s each", frequencies.len(), config.tone_duration_s);
        render_program(&frequencies, &config)
    };

    write_wav(&args.output, &samples, config.sample_rate_hz, args.output_format())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}
