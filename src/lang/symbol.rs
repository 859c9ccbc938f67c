//! Action table and frequency classification.
//!
//! Every detected frequency becomes exactly one [`Symbol`]: one of the twelve
//! reserved action tones, a variable named by its rounded frequency, or
//! unclassified noise.

use std::fmt;

use log::trace;

use crate::audio::Frequency;
use crate::params::ClassifierConfig;

/// Reserved action frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Immediate,
    Print,
    Add,
    Subtract,
    Multiply,
    Divide,
    CycleType,
    StringDefine,
    UserInput,
    FunctionDefine,
    FunctionExecute,
    VariableInit,
}

impl Action {
    /// All actions in ascending frequency order
    pub const ALL: [Action; 12] = [
        Action::Immediate,
        Action::Print,
        Action::Add,
        Action::Subtract,
        Action::Multiply,
        Action::Divide,
        Action::CycleType,
        Action::StringDefine,
        Action::UserInput,
        Action::FunctionDefine,
        Action::FunctionExecute,
        Action::VariableInit,
    ];

    /// Nominal tone of the action (Hz)
    pub fn frequency_hz(self) -> u32 {
        match self {
            Action::Immediate => 50,
            Action::Print => 110,
            Action::Add => 140,
            Action::Subtract => 170,
            Action::Multiply => 220,
            Action::Divide => 260,
            Action::CycleType => 310,
            Action::StringDefine => 390,
            Action::UserInput => 500,
            Action::FunctionDefine => 600,
            Action::FunctionExecute => 660,
            Action::VariableInit => 700,
        }
    }

    /// Number of variable arguments read right after the action.
    ///
    /// For encasing actions this is only the leading target; the body follows.
    pub fn arity(self) -> usize {
        match self {
            Action::Immediate => 2,
            Action::Add | Action::Subtract | Action::Multiply | Action::Divide => 3,
            Action::Print
            | Action::CycleType
            | Action::StringDefine
            | Action::UserInput
            | Action::FunctionDefine
            | Action::FunctionExecute
            | Action::VariableInit => 1,
        }
    }

    /// Encasing actions run until their own tone recurs
    pub fn is_encasing(self) -> bool {
        matches!(self, Action::StringDefine | Action::FunctionDefine)
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Immediate => "Immediate",
            Action::Print => "Print",
            Action::Add => "Add",
            Action::Subtract => "Subtract",
            Action::Multiply => "Multiply",
            Action::Divide => "Divide",
            Action::CycleType => "Cycle-Type",
            Action::StringDefine => "String-Define",
            Action::UserInput => "User-Input",
            Action::FunctionDefine => "Function-Define",
            Action::FunctionExecute => "Function-Execute",
            Action::VariableInit => "Variable-Init",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variable identifier: the variable's tone rounded to whole Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

/// Classified form of one detected frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Action(Action),
    Variable(VarId),
    Unclassified,
}

/// A symbol in stream order, with what is needed to use it as a literal
/// and to point at it in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub symbol: Symbol,

    /// Detected frequency rounded to whole Hz (0 when unclassified)
    pub hz: u32,

    /// Start of the analysis window the symbol came from (seconds)
    pub at_s: Option<f64>,
}

/// Stateless frequency-to-symbol mapping
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Round a frequency to its identifier, or `None` for silence and garbage
    pub fn quantize(&self, hz: f64) -> Option<u32> {
        if !hz.is_finite() || hz < self.config.silence_floor_hz || hz > u32::MAX as f64 {
            return None;
        }
        Some(hz.round() as u32)
    }

    /// Classify one frequency
    pub fn classify(&self, hz: f64) -> Symbol {
        let Some(id) = self.quantize(hz) else {
            return Symbol::Unclassified;
        };

        let tolerance = self.config.action_tolerance_hz;
        Action::ALL
            .iter()
            .find(|action| (hz - action.frequency_hz() as f64).abs() <= tolerance)
            .map_or(Symbol::Variable(VarId(id)), |&action| Symbol::Action(action))
    }

    /// Classify one frequency into a token
    pub fn token(&self, hz: f64, at_s: Option<f64>) -> Token {
        let symbol = self.classify(hz);
        trace!("{:.2} Hz -> {:?}", hz, symbol);
        Token {
            symbol,
            hz: self.quantize(hz).unwrap_or(0),
            at_s,
        }
    }

    /// Classify frequencies extracted from audio, keeping their timestamps
    pub fn tokenize(&self, frequencies: &[Frequency]) -> Vec<Token> {
        frequencies
            .iter()
            .map(|frequency| self.token(frequency.hz, Some(frequency.start_s)))
            .collect()
    }

    /// Classify a bare frequency list (no timing information)
    pub fn tokenize_hz(&self, frequencies: &[f64]) -> Vec<Token> {
        frequencies.iter().map(|&hz| self.token(hz, None)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_frequencies_ascending_and_spaced() {
        let hz: Vec<u32> = Action::ALL.iter().map(|a| a.frequency_hz()).collect();
        for pair in hz.windows(2) {
            assert!(pair[1] - pair[0] >= 30, "{:?} too close", pair);
        }
    }

    #[test]
    fn test_classify_actions_within_tolerance() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(110.0), Symbol::Action(Action::Print));
        assert_eq!(classifier.classify(100.0), Symbol::Action(Action::Print));
        assert_eq!(classifier.classify(119.9), Symbol::Action(Action::Print));
        assert_eq!(classifier.classify(605.3), Symbol::Action(Action::FunctionDefine));
        assert_eq!(classifier.classify(40.0), Symbol::Action(Action::Immediate));
    }

    #[test]
    fn test_classify_variables_quantized() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(120.5), Symbol::Variable(VarId(121)));
        assert_eq!(classifier.classify(432.4), Symbol::Variable(VarId(432)));
        assert_eq!(classifier.classify(431.6), Symbol::Variable(VarId(432)));
        // Letters live between and around the action tones
        assert_eq!(classifier.classify(72.0), Symbol::Variable(VarId(72)));
        assert_eq!(classifier.classify(66.0), Symbol::Variable(VarId(66)));
    }

    #[test]
    fn test_classify_silence_and_garbage() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(0.0), Symbol::Unclassified);
        assert_eq!(classifier.classify(0.4), Symbol::Unclassified);
        assert_eq!(classifier.classify(f64::NAN), Symbol::Unclassified);
        assert_eq!(classifier.classify(f64::INFINITY), Symbol::Unclassified);
        assert_eq!(classifier.classify(-50.0), Symbol::Unclassified);
    }

    #[test]
    fn test_variables_never_collide_with_actions() {
        let classifier = Classifier::default();

        for hz in 1..2000 {
            if let Symbol::Variable(VarId(id)) = classifier.classify(hz as f64) {
                assert!(Action::ALL.iter().all(|a| a.frequency_hz() != id));
            }
        }
    }

    #[test]
    fn test_tokens_keep_literal_value() {
        let classifier = Classifier::default();
        let tokens = classifier.tokenize_hz(&[390.0, 111.2, 0.0]);

        assert_eq!(tokens[0].hz, 390);
        assert_eq!(tokens[1].symbol, Symbol::Action(Action::Print));
        assert_eq!(tokens[1].hz, 111);
        assert_eq!(tokens[2].symbol, Symbol::Unclassified);
        assert_eq!(tokens[2].hz, 0);
        assert!(tokens.iter().all(|t| t.at_s.is_none()));
    }
}
