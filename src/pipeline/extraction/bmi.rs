use super::{round1, HeightSummary, WeightSummary};

const LBS_PER_KG: f64 = 2.205;

/// BMI for the intake, maximum and minimum weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BmiSummary {
    pub intake: f64,
    pub max: f64,
    pub min: f64,
}

/// `kg / m²` rounded to one decimal. A zero weight or height yields 0.0
/// rather than a ratio.
pub fn calculate_bmi(weight_lbs: f64, height_cm: f64) -> f64 {
    if weight_lbs <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    let meters = height_cm / 100.0;
    round1((weight_lbs / LBS_PER_KG) / (meters * meters))
}

pub fn bmi_summary(weights: &WeightSummary, height: &HeightSummary) -> BmiSummary {
    let height_cm = f64::from(height.height_cm);
    BmiSummary {
        intake: calculate_bmi(weights.intake, height_cm),
        max: calculate_bmi(weights.max, height_cm),
        min: calculate_bmi(weights.min, height_cm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_give_zero() {
        assert_eq!(calculate_bmi(0.0, 10.0), 0.0);
        assert_eq!(calculate_bmi(10.0, 0.0), 0.0);
        assert_eq!(calculate_bmi(0.0, 0.0), 0.0);
    }

    #[test]
    fn computes_rounded_bmi() {
        // 220.5 lbs = 100 kg, 2 m tall -> 25.0
        assert_eq!(calculate_bmi(220.5, 200.0), 25.0);
        // 300 lbs at 170 cm -> 136.05 kg / 2.89 m² = 47.08
        assert_eq!(calculate_bmi(300.0, 170.0), 47.1);
    }

    #[test]
    fn summary_uses_each_weight() {
        let weights = WeightSummary { intake: 0.0, max: 441.0, min: 220.5 };
        let height = HeightSummary { height_cm: 200, discrepancy_cm: 0 };
        let bmi = bmi_summary(&weights, &height);
        assert_eq!(bmi, BmiSummary { intake: 0.0, max: 50.0, min: 25.0 });
    }
}
