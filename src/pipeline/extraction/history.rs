//! Free-text history fields: smoking status, insurance, comorbidity list
//! and alcohol use. All scans run newest encounter first and never fail;
//! a missing field falls back to its sentinel.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{EncounterSequence, NO_ALCOHOL};
use crate::pipeline::segment::ENCOUNTER_MARKER;

static SMOKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)smoker\s*[:?\-]").expect("valid regex"));

static ALCOHOL_FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[^.!?;]*\balcohol[^.!?;]*").expect("valid regex")
});

const INSURANCE_LABEL: &str = "Insurance:";
const COMORBIDITIES_LABEL: &str = "Comorbidities:";
const ALCOHOL_LABEL: &str = "Alcohol:";

/// Text following the first `smoker:` style marker, trimmed. Empty when the
/// record never mentions it.
pub fn smoking_status(encounters: &EncounterSequence) -> String {
    encounters
        .lines()
        .find_map(|line| SMOKER_RE.find(line).map(|m| line[m.end()..].trim().to_string()))
        .unwrap_or_default()
}

/// Text after the first `Insurance:` label, trimmed. `None` when absent.
pub fn insurance(encounters: &EncounterSequence) -> Option<String> {
    encounters.lines().find_map(|line| {
        line.find(INSURANCE_LABEL)
            .map(|idx| line[idx + INSURANCE_LABEL.len()..].trim().to_string())
    })
}

/// Every non-blank line listed under a `Comorbidities:` heading.
///
/// A list runs until a blank line, the end of the encounter or the next
/// encounter's two-line header (the `ID:` line and the line before it).
/// Lists from all encounters accumulate into one set, so the duplicated
/// boundary lines are harmless.
pub fn comorbidities(encounters: &EncounterSequence) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for encounter in encounters {
        let mut recording = false;
        let mut lines = encounter.iter().peekable();
        while let Some(line) = lines.next() {
            if line.contains(COMORBIDITIES_LABEL) {
                recording = true;
                continue;
            }
            if !recording {
                continue;
            }
            let item = line.trim();
            let in_header = line.starts_with(ENCOUNTER_MARKER)
                || lines
                    .peek()
                    .is_some_and(|next| next.starts_with(ENCOUNTER_MARKER));
            if item.is_empty() || in_header {
                recording = false;
                continue;
            }
            found.insert(item.to_string());
        }
    }

    found
}

/// Latest alcohol-use description.
///
/// Prefers the value of an `Alcohol:` line; otherwise the first sentence
/// fragment that mentions alcohol. Falls back to `"0 Servings"`.
pub fn alcohol_use(encounters: &EncounterSequence) -> String {
    let labeled = encounters.lines().find_map(|line| {
        let value = line.trim_start().strip_prefix(ALCOHOL_LABEL)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    });
    if let Some(value) = labeled {
        return value;
    }

    encounters
        .lines()
        .filter(|line| !line.trim_start().starts_with(ALCOHOL_LABEL))
        .find_map(|line| ALCOHOL_FRAGMENT_RE.find(line))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NO_ALCOHOL.to_string())
}
