//! Record assembly: one patient file in, one flat record out.

use std::path::Path;

use super::error::RecordError;
use super::extraction::{self, FieldError};
use super::segment::segment;
use crate::config::BatchConfig;
use crate::models::{Field, PatientRecord};

const BYTES_PER_MB: u64 = 1024 * 1024;

fn malformed(field: Field) -> impl FnOnce(FieldError) -> RecordError {
    move |source| RecordError::Malformed { field, source }
}

/// Patient identifier from a file name: the stem, without the extension.
pub fn identifier_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
        .trim()
        .to_string()
}

/// Run every extractor over one file's text and combine the results.
pub fn assemble(filename: &str, raw_text: &str) -> Result<PatientRecord, RecordError> {
    let lines = extraction::prepare_lines(raw_text);
    let encounters = segment(&lines);

    let dates = extraction::visit_dates(&lines);
    let weights = extraction::summarize_weights(&encounters).map_err(malformed(Field::Weights))?;
    let height =
        extraction::height_and_discrepancy(&encounters).map_err(malformed(Field::Height))?;
    let bmi = extraction::bmi_summary(&weights, &height);
    let fasting_glucose =
        extraction::fasting_glucose(&encounters).map_err(malformed(Field::FastingGlucose))?;
    let a1c = extraction::hemoglobin_a1c(&encounters).map_err(malformed(Field::A1c))?;

    let record = PatientRecord {
        identifier: identifier_from_filename(filename),
        encounter_count: encounters.len(),
        recent_visit_date: dates.recent,
        intake_visit_date: dates.intake,
        intake_weight_lbs: weights.intake,
        max_weight_lbs: weights.max,
        min_weight_lbs: weights.min,
        height_cm: height.height_cm,
        height_discrepancy_cm: height.discrepancy_cm,
        intake_bmi: bmi.intake,
        max_bmi: bmi.max,
        min_bmi: bmi.min,
        smoking_status: extraction::smoking_status(&encounters),
        insurance: extraction::insurance(&encounters),
        fasting_glucose,
        a1c,
        comorbidities: extraction::comorbidities(&encounters),
        obesity_medications: extraction::obesity_medication(&encounters),
        alcohol: extraction::alcohol_use(&encounters),
    };

    tracing::debug!(
        file = %filename,
        encounters = record.encounter_count,
        max_weight = record.max_weight_lbs,
        height_cm = record.height_cm,
        "Assembled patient record"
    );

    Ok(record)
}

/// Read a patient file fully and assemble it.
///
/// Invalid UTF-8 is replaced rather than rejected; the capture process
/// does not guarantee clean text.
pub fn assemble_file(path: &Path, config: &BatchConfig) -> Result<PatientRecord, RecordError> {
    let missing = |source| RecordError::MissingInput {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(missing)?.len();
    if size > config.max_file_size_mb.saturating_mul(BYTES_PER_MB) {
        return Err(RecordError::FileTooLarge {
            size_mb: size as f64 / BYTES_PER_MB as f64,
            max_mb: config.max_file_size_mb,
        });
    }

    let bytes = std::fs::read(path).map_err(missing)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = %filename, "Input is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    assemble(filename, &text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_VISITS: &str = "\
Visit Date: 2023-05-01 10:30
ID: 100234
Today's Weight: 222lbs
Peak Adult Weight: 444 lbs
Intake Weight: 333 lbs
Height: 5'7\"
Insurance:  Blue Cross
Smoker: never
Fasting Glucose: 5.6
Hemoglobin A1c: 6-7
Comorbidities:
Hypertension
Sleep apnea

Obesity Medications: Phentermine 37.5 mg daily
Alcohol: 1 serving/week
Visit Date: 2021-01-12 14:00
ID: 100234
Today's Weight: 310 lbs
Intake Weight:
Height: 170 cm
Comorbidities:
Hypertension
";

    #[test]
    fn end_to_end_two_encounters() {
        let record = assemble("100234.txt", TWO_VISITS).unwrap();
        assert_eq!(record.identifier, "100234");
        assert_eq!(record.encounter_count, 2);
        assert_eq!(record.recent_visit_date, "2023-05-01");
        assert_eq!(record.intake_visit_date, "2021-01-12");
        assert_eq!(record.max_weight_lbs, 444.0);
        assert_eq!(record.min_weight_lbs, 222.0);
        assert_eq!(record.intake_weight_lbs, 333.0);
        assert_eq!(record.height_cm, 170);
        assert_eq!(record.height_discrepancy_cm, 0);
        assert_eq!(record.insurance.as_deref(), Some("Blue Cross"));
        assert_eq!(record.smoking_status, "never");
        assert_eq!(record.fasting_glucose, 5.6);
        assert_eq!(record.a1c, 6.5);
        assert_eq!(record.obesity_medications, "Phentermine (37.5 mg)");
        assert_eq!(record.alcohol, "1 serving/week");
        let comorbidities: Vec<&str> = record.comorbidities.iter().map(String::as_str).collect();
        assert_eq!(comorbidities, vec!["Hypertension", "Sleep apnea"]);
    }

    #[test]
    fn bmi_uses_record_height() {
        let record = assemble("100234.txt", TWO_VISITS).unwrap();
        // 444 lbs at 170 cm
        assert_eq!(record.max_bmi, 69.7);
        assert_eq!(record.min_bmi, 34.8);
        assert_eq!(record.intake_bmi, 52.3);
    }

    #[test]
    fn missing_intake_in_both_encounters() {
        let text = "\
Visit Date: 2023-05-01
ID: 7
Today's Weight: 568lbs
Peak Adult Weight: 345 lbs
Intake Weight:
Visit Date: 2022-05-01
ID: 7
Today's Weight: 222lbs
Peak Adult Weight: 444 lbs
Intake Weight:
";
        let record = assemble("7.txt", text).unwrap();
        assert_eq!(record.encounter_count, 2);
        assert_eq!(record.intake_weight_lbs, 0.0);
        assert_eq!(record.max_weight_lbs, 568.0);
        assert_eq!(record.min_weight_lbs, 222.0);
        assert_eq!(record.intake_bmi, 0.0);
    }

    #[test]
    fn empty_file_gets_sentinels() {
        let record = assemble("000.txt", "").unwrap();
        assert_eq!(record.encounter_count, 0);
        assert_eq!(record.recent_visit_date, "0000-00-00");
        assert_eq!(record.intake_visit_date, "0000-00-00");
        assert_eq!(record.max_weight_lbs, 0.0);
        assert_eq!(record.min_weight_lbs, 0.0);
        assert_eq!(record.height_cm, 0);
        assert_eq!(record.max_bmi, 0.0);
        assert_eq!(record.smoking_status, "");
        assert_eq!(record.insurance, None);
        assert!(record.comorbidities.is_empty());
        assert_eq!(record.obesity_medications, "");
        assert_eq!(record.alcohol, "0 Servings");
    }

    #[test]
    fn zero_width_characters_are_scrubbed() {
        let text = "Today\u{200C}'s Weight: 2\u{200C}50 lbs\nI\u{200C}nsurance: Medicare";
        let record = assemble("55.txt", text).unwrap();
        assert_eq!(record.max_weight_lbs, 250.0);
        assert_eq!(record.insurance.as_deref(), Some("Medicare"));
    }

    #[test]
    fn crlf_line_endings() {
        let text = "Comorbidities:\r\nAsthma\r\n\r\nAlcohol: none\r\n";
        let record = assemble("1.txt", text).unwrap();
        assert!(record.comorbidities.contains("Asthma"));
        assert_eq!(record.alcohol, "none");
    }

    #[test]
    fn identifier_is_file_stem() {
        assert_eq!(identifier_from_filename("100234.txt"), "100234");
        assert_eq!(identifier_from_filename(" MRN-77 .txt"), "MRN-77");
        assert_eq!(identifier_from_filename("noext"), "noext");
    }

    #[test]
    fn assemble_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("4411.txt");
        std::fs::write(&path, "Today's Weight: 250 lbs\n").unwrap();

        let record = assemble_file(&path, &BatchConfig::default()).unwrap();
        assert_eq!(record.identifier, "4411");
        assert_eq!(record.max_weight_lbs, 250.0);
    }

    #[test]
    fn assemble_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = assemble_file(&dir.path().join("absent.txt"), &BatchConfig::default())
            .unwrap_err();
        assert!(matches!(err, RecordError::MissingInput { .. }));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn assemble_file_rejects_oversized_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 2 * 1024 * 1024]).unwrap();

        let config = BatchConfig {
            max_file_size_mb: 1,
            ..BatchConfig::default()
        };
        let err = assemble_file(&path, &config).unwrap_err();
        assert!(matches!(err, RecordError::FileTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn assemble_file_accepts_huge_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("31.txt");
        std::fs::write(&path, "Today's Weight: 250 lbs\n").unwrap();

        let config = BatchConfig {
            max_file_size_mb: u64::MAX / 2,
            ..BatchConfig::default()
        };
        let record = assemble_file(&path, &config).unwrap();
        assert_eq!(record.max_weight_lbs, 250.0);
    }

    #[test]
    fn overflowing_weight_is_malformed() {
        let text = format!("Today's Weight: {} lbs\n", "9".repeat(400));
        let err = assemble("3.txt", &text).unwrap_err();
        assert!(matches!(
            err,
            RecordError::Malformed {
                field: Field::Weights,
                ..
            }
        ));
        assert_eq!(err.field(), Some(Field::Weights));
    }

    #[test]
    fn overflowing_glucose_is_malformed() {
        let text = format!("Fasting Glucose: {}\n", "1".repeat(320));
        let err = assemble("4.txt", &text).unwrap_err();
        assert_eq!(err.field(), Some(Field::FastingGlucose));
    }

    #[test]
    fn comorbidities_exclude_next_visit_header() {
        let text = "\
Comorbidities:
Asthma
Visit Date: 2021-01-01 09:00
ID: 7
Today's Weight: 250 lbs
";
        let record = assemble("7.txt", text).unwrap();
        assert_eq!(record.encounter_count, 2);
        let comorbidities: Vec<&str> = record.comorbidities.iter().map(String::as_str).collect();
        assert_eq!(comorbidities, vec!["Asthma"]);
    }

    #[test]
    fn assemble_file_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("9.txt");
        std::fs::write(&path, b"Insurance: Aetna\xff\nToday's Weight: 300 lbs\n").unwrap();

        let record = assemble_file(&path, &BatchConfig::default()).unwrap();
        assert_eq!(record.max_weight_lbs, 300.0);
        assert!(record.insurance.unwrap().starts_with("Aetna"));
    }
}
