use std::sync::LazyLock;

use regex::Regex;

use super::{number_tokens, parse_number, round1, FieldError};
use crate::models::EncounterSequence;

static FASTING_GLUCOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fasting\s+glucose|glucose\s+fasting").expect("valid regex")
});

static A1C_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)a1c").expect("valid regex"));

/// Values at or above this are dates, ordinals or other stray numbers.
const A1C_CEILING: f64 = 17.0;

/// Latest fasting glucose: the first number on the newest line that
/// mentions it. Lines naming the test without a value are skipped.
/// 0.0 when none is found.
pub fn fasting_glucose(encounters: &EncounterSequence) -> Result<f64, FieldError> {
    for line in encounters.lines().filter(|l| FASTING_GLUCOSE_RE.is_match(l)) {
        if let Some(token) = number_tokens(line).next() {
            return parse_number(token);
        }
    }
    Ok(0.0)
}

/// A1c value of one line, if it carries one.
///
/// The marker itself is removed first (its `1` is not a reading). Tokens
/// with a leading zero or at/above the ceiling are dropped; the rest are
/// averaged so a `6-7` range reports 6.5.
pub fn parse_a1c_line(line: &str) -> Result<Option<f64>, FieldError> {
    let stripped = A1C_RE.replace_all(line, " ");

    let mut values = Vec::new();
    for token in number_tokens(&stripped).filter(|t| !t.starts_with('0')) {
        let value = parse_number(token)?;
        if value < A1C_CEILING {
            values.push(value);
        }
    }

    if values.is_empty() {
        return Ok(None);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Ok(Some(round1(mean)))
}

/// Latest hemoglobin A1c, 0.0 when no line carries a usable value.
pub fn hemoglobin_a1c(encounters: &EncounterSequence) -> Result<f64, FieldError> {
    for line in encounters.lines().filter(|l| A1C_RE.is_match(l)) {
        if let Some(value) = parse_a1c_line(line)? {
            return Ok(value);
        }
    }
    Ok(0.0)
}
