//! Encounter segmentation.
//!
//! Splits a patient dump into encounters on lines starting with the
//! `ID:` header marker. The line before the marker and the marker itself
//! form a two-line visit header that belongs to both neighbouring
//! encounters, so each new buffer is seeded with the last two lines of the
//! one just sealed.

use crate::models::{Encounter, EncounterSequence};

/// Prefix of the line that opens an encounter header.
pub const ENCOUNTER_MARKER: &str = "ID:";

/// Number of header lines carried into the next encounter.
const CARRY_OVER: usize = 2;

/// Partition lines into encounters, preserving order.
///
/// A marker only seals the buffer once it holds more than two lines. The
/// trailing buffer is always sealed when non-empty, so `k` sealing markers
/// produce `k + 1` encounters. No lines at all produce an empty sequence.
pub fn segment<S: AsRef<str>>(lines: &[S]) -> EncounterSequence {
    let mut encounters = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in lines {
        let line: &str = line.as_ref();
        buffer.push(line.to_string());

        if line.starts_with(ENCOUNTER_MARKER) && buffer.len() > CARRY_OVER {
            let carried = buffer[buffer.len() - CARRY_OVER..].to_vec();
            let sealed = std::mem::replace(&mut buffer, carried);
            encounters.push(Encounter::new(sealed));
        }
    }

    if !buffer.is_empty() {
        encounters.push(Encounter::new(buffer));
    }

    tracing::trace!(encounters = encounters.len(), "Segmented record");
    EncounterSequence::new(encounters)
}
