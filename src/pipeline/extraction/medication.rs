//! Obesity medication extraction.
//!
//! Best-effort and first-match: the text after the `Obesity Medications:`
//! label is split into comma/semicolon separated entries, and the first
//! entry carrying a numeric dose and an `mg` unit is reported as
//! `"<Drug> (<amount> mg)"`. Dose and unit may appear in either order, and
//! the drug name may sit on either side of the dose.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::EncounterSequence;

const MEDICATION_LABEL: &str = "Obesity Medications:";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?|[A-Za-z][A-Za-z\-]*").expect("valid regex")
});

/// Words that describe dosing rather than naming a drug.
const FILLER_WORDS: &[&str] = &[
    "and", "bid", "daily", "day", "dose", "im", "inj", "injection", "mo", "month", "monthly",
    "nightly", "od", "once", "per", "po", "qd", "qhs", "qw", "sc", "sq", "subq",
    "tab", "tablet", "tablets", "tabs", "take", "takes", "taking", "tid", "twice",
    "week", "weekly", "x",
];

const UNIT: &str = "mg";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Amount(&'a str),
    Unit,
    Word(&'a str),
}

fn classify(token: &str) -> Token<'_> {
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        Token::Amount(token)
    } else if token.eq_ignore_ascii_case(UNIT) {
        Token::Unit
    } else {
        Token::Word(token)
    }
}

fn is_drug_name(word: &str) -> bool {
    word.len() >= 3
        && !FILLER_WORDS
            .iter()
            .any(|filler| filler.eq_ignore_ascii_case(word))
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format one medication entry, if it names a dose in mg.
pub fn parse_medication(entry: &str) -> Option<String> {
    let mut drug: Option<&str> = None;
    let mut amount: Option<&str> = None;
    let mut has_unit = false;

    for token in TOKEN_RE.find_iter(entry).map(|m| classify(m.as_str())) {
        match token {
            Token::Amount(value) if amount.is_none() => amount = Some(value),
            Token::Unit => has_unit = true,
            Token::Word(word) if drug.is_none() && is_drug_name(word) => drug = Some(word),
            _ => {}
        }
    }

    let amount = amount.filter(|_| has_unit)?;
    let formatted = match drug {
        Some(name) => format!("{} ({} {})", capitalize(name), amount, UNIT),
        None => format!("({} {})", amount, UNIT),
    };
    Some(formatted)
}

/// Medication named on the first `Obesity Medications:` line; empty when
/// that line has no dosed entry or the label never appears.
pub fn obesity_medication(encounters: &EncounterSequence) -> String {
    let Some(text) = encounters.lines().find_map(|line| {
        line.find(MEDICATION_LABEL)
            .map(|idx| &line[idx + MEDICATION_LABEL.len()..])
    }) else {
        return String::new();
    };

    text.split([',', ';'])
        .find_map(parse_medication)
        .unwrap_or_default()
}
