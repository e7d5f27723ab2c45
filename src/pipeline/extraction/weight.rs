//! Weight extraction.
//!
//! Each encounter may carry three labeled weights (today/current, peak adult,
//! intake). Values are free text such as `222lbs`, `200-222 lbs`,
//! `568lbs down 2 lbs from last time` or `345 lbs  Date: 2021-12-08`; the
//! rightmost number inside the plausible band wins.

use std::sync::LazyLock;

use regex::Regex;

use super::{number_tokens, parse_number, FieldError};
use crate::models::{Encounter, EncounterSequence};

/// Exclusive plausibility band in pounds. Years, day numbers and
/// "down 2 lbs" style deltas fall outside it.
const MIN_PLAUSIBLE_LBS: f64 = 100.0;
const MAX_PLAUSIBLE_LBS: f64 = 1000.0;

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?P<today>(?:Today['’]s|Current)\s+Weight)|(?P<peak>Peak\s+Adult\s+Weight)|(?P<intake>Intake\s+Weight))\s*:(?P<value>.*)$",
    )
    .expect("valid regex")
});

static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lbs?\.?").expect("valid regex"));

const DATE_SUFFIX: &str = "Date:";

/// The three weights recorded in one encounter; 0.0 when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EncounterWeights {
    pub today: f64,
    pub peak: f64,
    pub intake: f64,
}

impl EncounterWeights {
    fn values(&self) -> [f64; 3] {
        [self.today, self.peak, self.intake]
    }
}

/// Intake, maximum and minimum weight across a whole record, in pounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightSummary {
    pub intake: f64,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum WeightKind {
    Today,
    Peak,
    Intake,
}

/// Parse the value part of a weight line.
///
/// Drops the unit and any trailing `Date:` annotation, then keeps the last
/// number strictly inside the plausible band. `None` when nothing qualifies.
pub fn parse_weight_value(text: &str) -> Result<Option<f64>, FieldError> {
    let text = match text.find(DATE_SUFFIX) {
        Some(idx) => &text[..idx],
        None => text,
    };
    let text = UNIT_RE.replace_all(text, " ");

    let mut value = None;
    for token in number_tokens(&text) {
        let number = parse_number(token)?;
        if number > MIN_PLAUSIBLE_LBS && number < MAX_PLAUSIBLE_LBS {
            value = Some(number);
        }
    }
    Ok(value)
}

fn classify(line: &str) -> Option<(WeightKind, &str)> {
    let caps = LABEL_RE.captures(line)?;
    let kind = if caps.name("today").is_some() {
        WeightKind::Today
    } else if caps.name("peak").is_some() {
        WeightKind::Peak
    } else {
        WeightKind::Intake
    };
    let value = caps.name("value").map_or("", |m| m.as_str());
    Some((kind, value))
}

/// Weights of a single encounter. When a label repeats, the last line that
/// yields a value wins.
pub fn encounter_weights(encounter: &Encounter) -> Result<EncounterWeights, FieldError> {
    let mut weights = EncounterWeights::default();

    for line in encounter.iter() {
        let Some((kind, text)) = classify(line) else {
            continue;
        };
        let Some(value) = parse_weight_value(text)? else {
            continue;
        };
        match kind {
            WeightKind::Today => weights.today = value,
            WeightKind::Peak => weights.peak = value,
            WeightKind::Intake => weights.intake = value,
        }
    }

    Ok(weights)
}

/// Aggregate per-encounter weights.
///
/// - max: largest of all values seen
/// - min: smallest strictly-positive value seen
/// - intake: largest strictly-positive intake value seen
///
/// Every field stays 0.0 when no encounter yields a weight.
pub fn summarize_weights(encounters: &EncounterSequence) -> Result<WeightSummary, FieldError> {
    let mut summary = WeightSummary::default();
    let mut min: Option<f64> = None;

    for encounter in encounters {
        let weights = encounter_weights(encounter)?;
        for value in weights.values().into_iter().filter(|v| *v > 0.0) {
            summary.max = summary.max.max(value);
            min = Some(min.map_or(value, |m: f64| m.min(value)));
        }
        if weights.intake > summary.intake {
            summary.intake = weights.intake;
        }
    }

    summary.min = min.unwrap_or(0.0);
    Ok(summary)
}
