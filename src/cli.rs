//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::audio::OutputFormat;
use crate::params::{
    audio_constants, AnalysisConfig, ClassifierConfig, SynthesisConfig, TailPolicy,
    WindowFunction,
};

/// Interpreter command line arguments
#[derive(Parser, Debug)]
#[command(name = "musolang")]
#[command(about = "Run a program written as a sequence of sine tones", long_about = None)]
pub struct RunArgs {
    /// WAV file holding the program (or a frequency list with --from-list)
    #[arg(value_name = "FILE")]
    pub filename: PathBuf,

    /// Analysis interval: duration of one symbol (seconds)
    #[arg(short, long, value_name = "SECONDS", default_value_t = audio_constants::DEFAULT_INTERVAL_S)]
    pub interval: f64,

    /// Distance within which a tone matches an action (Hz)
    #[arg(long, value_name = "HZ", default_value_t = 10.0)]
    pub tolerance: f64,

    /// Zero-pad and analyse a trailing partial interval instead of dropping it
    #[arg(long)]
    pub pad_tail: bool,

    /// Apply a Hann window before the FFT
    #[arg(long)]
    pub hann: bool,

    /// Treat FILE as a whitespace separated frequency list instead of audio
    #[arg(long)]
    pub from_list: bool,

    /// Print the extracted frequencies
    #[arg(long)]
    pub frequencies: bool,

    /// Print the parsed program listing
    #[arg(long)]
    pub program: bool,

    /// Stop after parsing
    #[arg(long)]
    pub no_run: bool,
}

impl RunArgs {
    /// Analysis config for a stream at `sample_rate_hz`
    pub fn analysis_config(&self, sample_rate_hz: u32) -> AnalysisConfig {
        AnalysisConfig {
            tail: if self.pad_tail {
                TailPolicy::Pad
            } else {
                TailPolicy::Drop
            },
            window: if self.hann {
                WindowFunction::Hann
            } else {
                WindowFunction::Rectangular
            },
            ..AnalysisConfig::new(sample_rate_hz, self.interval)
        }
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            action_tolerance_hz: self.tolerance,
            ..ClassifierConfig::default()
        }
    }
}

/// Encoder command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavgen")]
#[command(about = "Render a frequency list as a WAV file of sine tones", long_about = None)]
pub struct EncodeArgs {
    /// Frequency list (or CSV timeline with --timeline)
    #[arg(value_name = "FILE")]
    pub freqs: PathBuf,

    /// Output WAV path
    #[arg(short, long, value_name = "PATH", default_value = "tones.wav")]
    pub output: PathBuf,

    /// Duration of each tone (seconds); must match the interpreter's interval
    #[arg(short, long, value_name = "SECONDS", default_value_t = audio_constants::DEFAULT_INTERVAL_S)]
    pub interval: f64,

    /// Output sample rate (Hz)
    #[arg(short, long, value_name = "HZ", default_value_t = audio_constants::DEFAULT_SAMPLE_RATE_HZ)]
    pub sample_rate: u32,

    /// Amplitude of each tone before normalisation
    #[arg(short, long, default_value_t = audio_constants::DEFAULT_AMPLITUDE)]
    pub amplitude: f32,

    /// Write 32-bit float samples instead of 16-bit PCM
    #[arg(long)]
    pub float: bool,

    /// Treat FILE as `start,frequency,duration` rows
    #[arg(long)]
    pub timeline: bool,

    /// Skip the first timeline row
    #[arg(long, requires = "timeline")]
    pub skip_header: bool,

    /// Total timeline length (seconds); defaults to the end of the last tone
    #[arg(short, long, value_name = "SECONDS", requires = "timeline")]
    pub duration: Option<f64>,
}

impl EncodeArgs {
    pub fn synthesis_config(&self) -> SynthesisConfig {
        SynthesisConfig {
            sample_rate_hz: self.sample_rate,
            tone_duration_s: self.interval,
            amplitude: self.amplitude,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.float {
            OutputFormat::Float32
        } else {
            OutputFormat::Pcm16
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs::parse_from(["musolang", "program.wav"]);
        let analysis = args.analysis_config(8000);

        assert_eq!(args.filename, PathBuf::from("program.wav"));
        assert_eq!(analysis.interval_s, 1.0);
        assert_eq!(analysis.tail, TailPolicy::Drop);
        assert_eq!(analysis.window, WindowFunction::Rectangular);
        assert_eq!(args.classifier_config().action_tolerance_hz, 10.0);
        assert!(!args.no_run);
    }

    #[test]
    fn test_run_args_flags() {
        let args = RunArgs::parse_from([
            "musolang",
            "-i",
            "0.5",
            "--pad-tail",
            "--hann",
            "--tolerance",
            "5",
            "--program",
            "--no-run",
            "prog.txt",
            "--from-list",
        ]);
        let analysis = args.analysis_config(44100);

        assert_eq!(analysis.interval_s, 0.5);
        assert_eq!(analysis.tail, TailPolicy::Pad);
        assert_eq!(analysis.window, WindowFunction::Hann);
        assert_eq!(args.classifier_config().action_tolerance_hz, 5.0);
        assert!(args.program && args.no_run && args.from_list);
    }

    #[test]
    fn test_encode_args() {
        let args = EncodeArgs::parse_from(["wavgen", "freqs.txt", "-s", "8000", "--float"]);
        let config = args.synthesis_config();

        assert_eq!(args.output, PathBuf::from("tones.wav"));
        assert_eq!(config.sample_rate_hz, 8000);
        assert_eq!(config.tone_duration_s, 1.0);
        assert_eq!(args.output_format(), OutputFormat::Float32);
        assert!(!args.timeline);
    }

    #[test]
    fn test_timeline_only_flags_require_timeline() {
        assert!(EncodeArgs::try_parse_from(["wavgen", "f.csv", "--skip-header"]).is_err());
        let args =
            EncodeArgs::try_parse_from(["wavgen", "f.csv", "--timeline", "-d", "3"]).unwrap();
        assert_eq!(args.duration, Some(3.0));
    }
}
