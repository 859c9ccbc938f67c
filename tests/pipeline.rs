//! End-to-end: frequency list → tones → WAV → frequencies → program → output.

use musolang::audio::{read_wav, render_program, write_wav, OutputFormat};
use musolang::lang::{Action, Interpreter, ScriptedConsole, Symbol, Value, VarId, VariableStore};
use musolang::params::{AnalysisConfig, ClassifierConfig, SynthesisConfig};
use musolang::pipeline::{run_samples, Decoder};
use musolang::source::parse_frequency_list;

const SAMPLE_RATE: u32 = 8000;

fn synthesis() -> SynthesisConfig {
    SynthesisConfig {
        sample_rate_hz: SAMPLE_RATE,
        tone_duration_s: 1.0,
        amplitude: 0.5,
    }
}

/// Hello-style program: S = "Hi", print S, A = 66 + 66, print A
const PROGRAM: &str = "
# String-Define 432 'H' 'i' String-Define
390 432 72 105 390
110 432              # Print
50 66 66             # Immediate: 66 := 66
140 800 66 66        # Add: 800 := 66 + 66
110 800
";

#[test]
fn test_encode_decode_run() {
    let frequencies = parse_frequency_list(PROGRAM).unwrap();
    let samples = render_program(&frequencies, &synthesis());

    let mut interpreter = Interpreter::new(ScriptedConsole::default());
    let store = run_samples(&samples, synthesis().analysis(), &mut interpreter).unwrap();

    assert_eq!(
        interpreter.console().output(),
        &["Hi".to_string(), "132".to_string()]
    );
    assert_eq!(store.get(VarId(800)), Some(&Value::Number(132.0)));
}

#[test]
fn test_decoding_recovers_classification() {
    let frequencies = [50.0, 433.0, 700.0, 999.0, 660.0, 0.0, 128.0, 599.0, 312.0, 43.0];
    let samples = render_program(&frequencies, &synthesis());

    let decoder = Decoder::new(synthesis().analysis(), ClassifierConfig::default()).unwrap();
    let decoded_hz: Vec<f64> = decoder
        .extractor()
        .extract(&samples)
        .iter()
        .map(|f| f.hz)
        .collect();
    assert_eq!(decoded_hz, frequencies.to_vec());

    let classify = |hz: &[f64]| -> Vec<Symbol> {
        decoder
            .classifier()
            .tokenize_hz(hz)
            .iter()
            .map(|t| t.symbol)
            .collect()
    };
    assert_eq!(classify(&decoded_hz), classify(&frequencies));
}

#[test]
fn test_off_bin_tones_classify_like_their_frequencies() {
    // 1 Hz bins: every tone lands on its nearest bin
    let frequencies = [441.3, 103.7, 657.8, 1234.2, 69.6, 501.9, 119.6];
    let samples = render_program(&frequencies, &synthesis());

    let decoder = Decoder::new(synthesis().analysis(), ClassifierConfig::default()).unwrap();
    let decoded = decoder.extractor().extract(&samples);
    assert_eq!(decoded.len(), frequencies.len());
    for (found, &hz) in decoded.iter().zip(&frequencies) {
        assert!((found.hz - hz).abs() <= 0.5, "{} Hz decoded as {}", hz, found.hz);
    }

    let classifier = decoder.classifier();
    let decoded_symbols: Vec<Symbol> = decoded.iter().map(|f| classifier.classify(f.hz)).collect();
    let expected: Vec<Symbol> = frequencies.iter().map(|&hz| classifier.classify(hz)).collect();
    assert_eq!(decoded_symbols, expected);

    assert_eq!(expected[0], Symbol::Variable(VarId(441)));
    assert_eq!(expected[1], Symbol::Action(Action::Print));
    assert_eq!(expected[2], Symbol::Action(Action::FunctionExecute));
    assert_eq!(expected[3], Symbol::Variable(VarId(1234)));
    assert_eq!(expected[4], Symbol::Variable(VarId(70)));
    assert_eq!(expected[5], Symbol::Action(Action::UserInput));
    // 119.6 Hz peaks at 120 Hz, the edge of the Print window
    assert_eq!(expected[6], Symbol::Action(Action::Print));
}

#[test]
fn test_wav_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("program.wav");

    let frequencies = parse_frequency_list(PROGRAM).unwrap();
    let samples = render_program(&frequencies, &synthesis());
    write_wav(&path, &samples, SAMPLE_RATE, OutputFormat::Pcm16).unwrap();

    let audio = read_wav(&path).unwrap();
    assert_eq!(audio.sample_rate_hz, SAMPLE_RATE);
    assert_eq!(audio.samples.len(), samples.len());

    let decoder = Decoder::new(
        AnalysisConfig::new(audio.sample_rate_hz, 1.0),
        ClassifierConfig::default(),
    )
    .unwrap();
    let mut store = VariableStore::new();
    let decoded = decoder.decode(&audio.samples, &mut store).unwrap();
    assert_eq!(decoded.program.len(), 5);

    let mut interpreter = Interpreter::new(ScriptedConsole::default());
    interpreter.run(&decoded.program, &mut store).unwrap();
    assert_eq!(interpreter.console().output()[0], "Hi");
}

#[test]
fn test_recursive_function_until_input_runs_out() {
    // F := { User-Input 432, Print 432, Execute F }; Execute F
    let frequencies = [600.0, 440.0, 500.0, 432.0, 110.0, 432.0, 660.0, 440.0, 600.0, 660.0, 440.0];
    let samples = render_program(&frequencies, &synthesis());

    let mut interpreter = Interpreter::new(ScriptedConsole::new(["a", "b", "c"]));
    let err = run_samples(&samples, synthesis().analysis(), &mut interpreter).unwrap_err();

    assert_eq!(interpreter.console().output(), &["a", "b", "c"]);
    assert!(err.to_string().contains("input channel closed"));
}
