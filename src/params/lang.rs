//! Symbol classification configuration.

use crate::error::ConfigError;

/// Tolerances used when mapping a detected frequency to a symbol
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Absolute distance (Hz, inclusive) within which a frequency matches an action.
    /// Must stay below half the 30 Hz minimum spacing between action frequencies.
    pub action_tolerance_hz: f64,

    /// Frequencies below this (Hz) are silence and classify as unclassified
    pub silence_floor_hz: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            action_tolerance_hz: 10.0,
            silence_floor_hz: 1.0,
        }
    }
}

impl ClassifierConfig {
    /// Largest tolerance that keeps neighbouring actions disjoint (exclusive)
    pub const MAX_TOLERANCE_HZ: f64 = 15.0;

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.action_tolerance_hz;
        if !(tolerance >= 0.0 && tolerance < Self::MAX_TOLERANCE_HZ) {
            return Err(ConfigError::BadTolerance {
                got: tolerance,
                max: Self::MAX_TOLERANCE_HZ,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_bounds() {
        assert!(ClassifierConfig::default().validate().is_ok());

        let wide = ClassifierConfig {
            action_tolerance_hz: 15.0,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::BadTolerance { .. })
        ));

        let nan = ClassifierConfig {
            action_tolerance_hz: f64::NAN,
            ..ClassifierConfig::default()
        };
        assert!(nan.validate().is_err());
    }
}
