use std::collections::BTreeSet;

use serde::Serialize;

/// Macro to generate a tag enum with as_str + Display
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// Extraction stage a failure came from. Only numeric extractors can fail.
str_enum!(Field {
    Weights => "weights",
    Height => "height",
    FastingGlucose => "fasting_glucose",
    A1c => "a1c",
});

/// Sentinel for a visit date that could not be established.
pub const NO_DATE: &str = "0000-00-00";

/// Sentinel for a record without any alcohol-use mention.
pub const NO_ALCOHOL: &str = "0 Servings";

/// Column names in output order. Serialized records use the same order.
pub const FIELD_NAMES: [&str; 19] = [
    "Patient Number",
    "Encounters",
    "Recent Visit Date",
    "Intake Visit Date",
    "Intake WeightLBS",
    "Max WeightLBS",
    "Min WeightLBS",
    "HeightCM",
    "Height DiscrepancyCM",
    "Intake BMI",
    "Max BMI",
    "Min BMI",
    "Smoker",
    "Insurance",
    "Fasting Glucose",
    "A1c",
    "Comorbidities",
    "Obesity Medications",
    "Alcohol",
];

/// A single typed cell of a patient row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Count(u64),
    Number(f64),
    Text(String),
    Set(Vec<String>),
    Missing,
}

/// One patient's flattened metrics. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    #[serde(rename = "Patient Number")]
    pub identifier: String,
    #[serde(rename = "Encounters")]
    pub encounter_count: usize,
    #[serde(rename = "Recent Visit Date")]
    pub recent_visit_date: String,
    #[serde(rename = "Intake Visit Date")]
    pub intake_visit_date: String,
    #[serde(rename = "Intake WeightLBS")]
    pub intake_weight_lbs: f64,
    #[serde(rename = "Max WeightLBS")]
    pub max_weight_lbs: f64,
    #[serde(rename = "Min WeightLBS")]
    pub min_weight_lbs: f64,
    #[serde(rename = "HeightCM")]
    pub height_cm: u32,
    #[serde(rename = "Height DiscrepancyCM")]
    pub height_discrepancy_cm: u32,
    #[serde(rename = "Intake BMI")]
    pub intake_bmi: f64,
    #[serde(rename = "Max BMI")]
    pub max_bmi: f64,
    #[serde(rename = "Min BMI")]
    pub min_bmi: f64,
    #[serde(rename = "Smoker")]
    pub smoking_status: String,
    #[serde(rename = "Insurance")]
    pub insurance: Option<String>,
    #[serde(rename = "Fasting Glucose")]
    pub fasting_glucose: f64,
    #[serde(rename = "A1c")]
    pub a1c: f64,
    #[serde(rename = "Comorbidities")]
    pub comorbidities: BTreeSet<String>,
    #[serde(rename = "Obesity Medications")]
    pub obesity_medications: String,
    #[serde(rename = "Alcohol")]
    pub alcohol: String,
}

impl PatientRecord {
    /// The record as an ordered field-name → value mapping, in
    /// [`FIELD_NAMES`] order.
    pub fn to_row(&self) -> Vec<(&'static str, FieldValue)> {
        let values = [
            FieldValue::Text(self.identifier.clone()),
            FieldValue::Count(self.encounter_count as u64),
            FieldValue::Text(self.recent_visit_date.clone()),
            FieldValue::Text(self.intake_visit_date.clone()),
            FieldValue::Number(self.intake_weight_lbs),
            FieldValue::Number(self.max_weight_lbs),
            FieldValue::Number(self.min_weight_lbs),
            FieldValue::Count(u64::from(self.height_cm)),
            FieldValue::Count(u64::from(self.height_discrepancy_cm)),
            FieldValue::Number(self.intake_bmi),
            FieldValue::Number(self.max_bmi),
            FieldValue::Number(self.min_bmi),
            FieldValue::Text(self.smoking_status.clone()),
            match &self.insurance {
                Some(text) => FieldValue::Text(text.clone()),
                None => FieldValue::Missing,
            },
            FieldValue::Number(self.fasting_glucose),
            FieldValue::Number(self.a1c),
            FieldValue::Set(self.comorbidities.iter().cloned().collect()),
            FieldValue::Text(self.obesity_medications.clone()),
            FieldValue::Text(self.alcohol.clone()),
        ];
        FIELD_NAMES.into_iter().zip(values).collect()
    }
}
