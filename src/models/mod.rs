pub mod encounter;
pub mod record;

pub use encounter::{Encounter, EncounterSequence};
pub use record::{Field, FieldValue, PatientRecord, FIELD_NAMES, NO_ALCOHOL, NO_DATE};
