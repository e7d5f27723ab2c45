use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::{parse_number, FieldError};
use crate::models::EncounterSequence;

const CM_PER_INCH: f64 = 2.54;

/// `5'6`, `5' 10"` or `165.1 cm` / `165cm`.
static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<feet>\d)'\s*(?P<inches>\d{1,2})|(?P<cm>\d+(?:\.\d+)?)\s*cm\b")
        .expect("valid regex")
});

/// Reported height and the spread between distinct recorded heights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeightSummary {
    pub height_cm: u32,
    pub discrepancy_cm: u32,
}

/// All height tokens found in `text`, as written.
pub fn height_tokens(text: &str) -> impl Iterator<Item = &str> {
    HEIGHT_RE.find_iter(text).map(|m| m.as_str())
}

/// Convert one height token to whole centimeters. `None` if the token is
/// not a height.
pub fn token_to_cm(token: &str) -> Result<Option<u32>, FieldError> {
    let Some(caps) = HEIGHT_RE.captures(token) else {
        return Ok(None);
    };

    let cm = match (caps.name("feet"), caps.name("inches"), caps.name("cm")) {
        (Some(feet), Some(inches), _) => {
            let inches = parse_number(feet.as_str())? * 12.0 + parse_number(inches.as_str())?;
            inches * CM_PER_INCH
        }
        (_, _, Some(cm)) => parse_number(cm.as_str())?,
        _ => return Ok(None),
    };

    Ok(Some(cm.round() as u32))
}

/// Normalize tokens to centimeters and report `(max, max - min)` over the
/// distinct values. Order of the tokens does not matter.
pub fn normalize_heights<S: AsRef<str>>(tokens: &[S]) -> Result<HeightSummary, FieldError> {
    let mut distinct = BTreeSet::new();
    for token in tokens {
        if let Some(cm) = token_to_cm(token.as_ref())? {
            distinct.insert(cm);
        }
    }

    match (distinct.first(), distinct.last()) {
        (Some(&min), Some(&max)) => Ok(HeightSummary {
            height_cm: max,
            discrepancy_cm: max - min,
        }),
        _ => Ok(HeightSummary::default()),
    }
}

/// Height across every line of the record.
pub fn height_and_discrepancy(encounters: &EncounterSequence) -> Result<HeightSummary, FieldError> {
    let tokens: Vec<&str> = encounters.lines().flat_map(height_tokens).collect();
    normalize_heights(&tokens)
}
