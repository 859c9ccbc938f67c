//! Text sources for the encoder.
//!
//! A frequency list is whitespace separated numbers read top to bottom, left
//! to right; `#` comments out the rest of a line. A timeline has one
//! `start_s,frequency_hz,duration_s` row per tone.

use crate::audio::Tone;
use crate::error::SourceError;

/// Parse a frequency list (Hz)
pub fn parse_frequency_list(text: &str) -> Result<Vec<f64>, SourceError> {
    let mut frequencies = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let code = line.split('#').next().unwrap_or_default();

        let mut column = 0;
        for token in code.split_whitespace() {
            // Byte offsets are fine for the ASCII numbers this format holds
            column = code[column..].find(token).map_or(column, |i| column + i);
            let hz = token
                .parse::<f64>()
                .ok()
                .filter(|hz| hz.is_finite() && *hz >= 0.0)
                .ok_or_else(|| SourceError::BadFrequency {
                    line: line_index + 1,
                    column: column + 1,
                    token: token.to_string(),
                })?;
            frequencies.push(hz);
            column += token.len();
        }
    }

    Ok(frequencies)
}

/// Parse timeline rows, optionally skipping a header row
pub fn parse_timeline(text: &str, skip_header: bool) -> Result<Vec<Tone>, SourceError> {
    let mut tones = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line_number = line_index + 1;
        if (skip_header && line_index == 0) || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(SourceError::FieldCount {
                line: line_number,
                got: fields.len(),
            });
        }

        let mut values = [0.0; 3];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse::<f64>().map_err(|_| SourceError::BadField {
                line: line_number,
                field: field.to_string(),
            })?;
        }
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SourceError::OutOfRange { line: line_number });
        }

        let [start_s, frequency_hz, duration_s] = values;
        tones.push(Tone {
            start_s,
            frequency_hz,
            duration_s,
        });
    }

    Ok(tones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_list_order_and_comments() {
        let text = "50 432 66   # A = 66\n\n110\t432\n# trailing comment only\n";
        assert_eq!(
            parse_frequency_list(text).unwrap(),
            vec![50.0, 432.0, 66.0, 110.0, 432.0]
        );
    }

    #[test]
    fn test_frequency_list_decimals() {
        assert_eq!(parse_frequency_list("110.5 0").unwrap(), vec![110.5, 0.0]);
    }

    #[test]
    fn test_frequency_list_reports_position() {
        assert_eq!(
            parse_frequency_list("50 432\n110  abc").unwrap_err(),
            SourceError::BadFrequency {
                line: 2,
                column: 6,
                token: "abc".to_string(),
            }
        );
        assert!(parse_frequency_list("-5").is_err());
        assert!(parse_frequency_list("inf").is_err());
    }

    #[test]
    fn test_repeated_token_column() {
        assert_eq!(
            parse_frequency_list("1 1 x").unwrap_err(),
            SourceError::BadFrequency {
                line: 1,
                column: 5,
                token: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_timeline() {
        let text = "start,freq,duration\n0, 110, 1\n1.5,432,0.5\n";
        let tones = parse_timeline(text, true).unwrap();
        assert_eq!(
            tones,
            vec![
                Tone {
                    start_s: 0.0,
                    frequency_hz: 110.0,
                    duration_s: 1.0,
                },
                Tone {
                    start_s: 1.5,
                    frequency_hz: 432.0,
                    duration_s: 0.5,
                },
            ]
        );

        assert_eq!(
            parse_timeline(text, false).unwrap_err(),
            SourceError::BadField {
                line: 1,
                field: "start".to_string(),
            }
        );
    }

    #[test]
    fn test_timeline_errors() {
        assert_eq!(
            parse_timeline("0,110\n", false).unwrap_err(),
            SourceError::FieldCount { line: 1, got: 2 }
        );
        assert_eq!(
            parse_timeline("0,110,-1\n", false).unwrap_err(),
            SourceError::OutOfRange { line: 1 }
        );
    }
}
