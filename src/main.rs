//! musolang - run a program encoded as a sequence of sine tones
//!
//! Each interval of the input audio carries one tone. Reserved tones are
//! actions, every other tone names a variable, and the decoded program runs
//! against stdin/stdout.

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use musolang::audio::read_wav;
use musolang::cli::RunArgs;
use musolang::lang::{Interpreter, Program, StdConsole, VariableStore};
use musolang::params::audio_constants;
use musolang::pipeline::Decoder;
use musolang::source::parse_frequency_list;

fn main() -> Result<()> {
    env_logger::init();
    let args = RunArgs::parse();

    let mut store = VariableStore::new();
    let program = decode(&args, &mut store)?;

    if args.program {
        print!("{}", program);
    }
    if args.no_run {
        return Ok(());
    }

    let mut interpreter = Interpreter::new(StdConsole);
    interpreter.run(&program, &mut store)?;
    info!("executed {} instructions", interpreter.executed());

    Ok(())
}

/// Decode the input file into a program, binding functions into `store`
fn decode(args: &RunArgs, store: &mut VariableStore) -> Result<Program> {
    let path = &args.filename;

    if args.from_list {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let frequencies = parse_frequency_list(&text)
            .with_context(|| format!("invalid frequency list {}", path.display()))?;
        if args.frequencies {
            print_frequencies(frequencies.iter().copied());
        }

        // No audio to analyse, only the classifier is used
        let analysis = args.analysis_config(audio_constants::DEFAULT_SAMPLE_RATE_HZ);
        let decoder = Decoder::new(analysis, args.classifier_config())?;
        return Ok(decoder.decode_frequencies(&frequencies, store)?);
    }

    let audio = read_wav(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoder = Decoder::new(
        args.analysis_config(audio.sample_rate_hz),
        args.classifier_config(),
    )?;
    let decoded = decoder.decode(&audio.samples, store)?;
    if args.frequencies {
        print_frequencies(decoded.frequencies.iter().map(|f| f.hz));
    }

    Ok(decoded.program)
}

fn print_frequencies(frequencies: impl Iterator<Item = f64>) {
    let line: Vec<String> = frequencies.map(|hz| hz.to_string()).collect();
    println!("{}", line.join(" "));
}
