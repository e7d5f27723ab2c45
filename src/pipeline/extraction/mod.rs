pub mod sanitize;
pub mod dates;
pub mod weight;
pub mod height;
pub mod bmi;
pub mod labs;
pub mod history;
pub mod medication;

pub use sanitize::*;
pub use dates::*;
pub use weight::*;
pub use height::*;
pub use bmi::*;
pub use labs::*;
pub use history::*;
pub use medication::*;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Failure inside a single field extractor. "No match" is never an error;
/// extractors fall back to their sentinel instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Numeric token is not a finite number ({digits} digits)")]
    InvalidNumber { digits: usize },
}

/// Unsigned integer or decimal token, e.g. `222`, `6.2`, `08`.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"));

/// All numeric tokens of `text`, left to right, as written.
pub(crate) fn number_tokens(text: &str) -> impl Iterator<Item = &str> {
    NUMBER_RE.find_iter(text).map(|m| m.as_str())
}

/// Parse a matched numeric token. A digit run too long for `f64` overflows
/// to infinity and is rejected; such a value means the text is corrupt.
pub(crate) fn parse_number(token: &str) -> Result<f64, FieldError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(FieldError::InvalidNumber {
            digits: token.len(),
        })
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_tokens_split_ranges_and_units() {
        let tokens: Vec<&str> = number_tokens("200-444.0lbs on 2021/12/08").collect();
        assert_eq!(tokens, vec!["200", "444.0", "2021", "12", "08"]);
    }

    #[test]
    fn parse_number_rejects_overflowing_digit_runs() {
        let token = "9".repeat(400);
        let err = parse_number(&token).unwrap_err();
        assert_eq!(err, FieldError::InvalidNumber { digits: 400 });
        assert!(err.to_string().contains("400 digits"));
        assert_eq!(parse_number("08").unwrap(), 8.0);
        assert_eq!(parse_number(&"9".repeat(300)).unwrap(), 1e300);
    }

    #[test]
    fn round1_one_decimal() {
        assert_eq!(round1(6.66), 6.7);
        assert_eq!(round1(52.34), 52.3);
    }
}
