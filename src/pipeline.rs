//! Decode-and-execute pipeline.
//!
//! Samples → frequencies → symbols → program, then program → side effects.
//! Decoding finishes (and can fail) before anything runs.

use log::info;

use crate::audio::{Frequency, FrequencyExtractor};
use crate::error::Result;
use crate::lang::{parse, Classifier, Console, Interpreter, Program, Token, VariableStore};
use crate::params::{AnalysisConfig, ClassifierConfig};

/// Everything recovered from one decoding pass
#[derive(Debug, Clone)]
pub struct Decoded {
    pub frequencies: Vec<Frequency>,
    pub tokens: Vec<Token>,
    pub program: Program,
}

/// Configured extractor and classifier
pub struct Decoder {
    extractor: FrequencyExtractor,
    classifier: Classifier,
}

impl Decoder {
    pub fn new(analysis: AnalysisConfig, classifier: ClassifierConfig) -> Result<Self> {
        classifier.validate()?;
        Ok(Self {
            extractor: FrequencyExtractor::new(analysis)?,
            classifier: Classifier::new(classifier),
        })
    }

    pub fn extractor(&self) -> &FrequencyExtractor {
        &self.extractor
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Decode samples into a program, binding its functions into `store`
    pub fn decode(&self, samples: &[f32], store: &mut VariableStore) -> Result<Decoded> {
        let frequencies = self.extractor.extract(samples);
        let tokens = self.classifier.tokenize(&frequencies);
        let program = parse(&tokens, store)?;
        info!(
            "decoded {} windows into {} instructions",
            frequencies.len(),
            program.len()
        );

        Ok(Decoded {
            frequencies,
            tokens,
            program,
        })
    }

    /// Decode a bare frequency list, skipping the audio round trip
    pub fn decode_frequencies(&self, frequencies: &[f64], store: &mut VariableStore) -> Result<Program> {
        let tokens = self.classifier.tokenize_hz(frequencies);
        Ok(parse(&tokens, store)?)
    }
}

/// Decode `samples` and run the result on a fresh store.
///
/// Returns the store so callers can inspect the final state.
pub fn run_samples<C: Console>(
    samples: &[f32],
    analysis: AnalysisConfig,
    interpreter: &mut Interpreter<C>,
) -> Result<VariableStore> {
    let decoder = Decoder::new(analysis, ClassifierConfig::default())?;
    let mut store = VariableStore::new();
    let decoded = decoder.decode(samples, &mut store)?;
    interpreter.run(&decoded.program, &mut store)?;
    Ok(store)
}
