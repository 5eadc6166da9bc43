//! Growth function: instantaneous monthly growth from the three factor scores.

use crate::core::species::SpeciesProfile;
use crate::core::suitability::SCORE_FLOOR;
use crate::domain::model::ClimateRecord;
use crate::utils::error::Result;
use crate::utils::validation::{validate_open_unit_interval, validate_positive_f64};
use serde::{Deserialize, Serialize};

/// Maximum theoretical monthly growth under ideal conditions.
pub const BASE_RATE: f64 = 80.0;

/// Fraction of biomass carried into the next month.
pub const RETENTION: f64 = 0.9;

/// Empirical tunables of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    pub base_rate: f64,
    pub retention: f64,
    pub score_floor: f64,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            base_rate: BASE_RATE,
            retention: RETENTION,
            score_floor: SCORE_FLOOR,
        }
    }
}

impl ModelConstants {
    pub fn validate(&self) -> Result<()> {
        validate_positive_f64("model.base_rate", self.base_rate)?;
        validate_open_unit_interval("model.retention", self.retention)?;
        validate_open_unit_interval("model.score_floor", self.score_floor)?;
        Ok(())
    }

    /// Smallest growth any record can produce.
    pub fn min_growth(&self) -> f64 {
        self.base_rate * self.score_floor.powi(3)
    }
}

/// Per-factor scores behind one growth value, kept for progress logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthBreakdown {
    pub temperature: f64,
    pub nutrient: f64,
    pub sunlight: f64,
    pub growth: f64,
}

pub fn evaluate(
    record: &ClimateRecord,
    profile: &SpeciesProfile,
    constants: &ModelConstants,
) -> GrowthBreakdown {
    let floor = constants.score_floor;
    let temperature = profile.temperature().score(record.temp_max, floor);
    let nutrient = profile.nutrient().score(record.nutrient, floor);
    let sunlight = profile.sunlight().score(record.sunlight, floor);
    GrowthBreakdown {
        temperature,
        nutrient,
        sunlight,
        growth: constants.base_rate * temperature * nutrient * sunlight,
    }
}

/// `BASE_RATE * temp_score * nutrient_score * sunlight_score` with the default constants.
pub fn growth(record: &ClimateRecord, profile: &SpeciesProfile) -> f64 {
    evaluate(record, profile, &ModelConstants::default()).growth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::SpeciesTable;
    use chrono::NaiveDate;

    fn record(temp_max: f64, sunlight: f64, nutrient: f64) -> ClimateRecord {
        ClimateRecord {
            date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            temp_max,
            sunlight,
            nutrient,
        }
    }

    #[test]
    fn test_ideal_conditions_give_base_rate() {
        let table = SpeciesTable::builtin();
        let ulva = table.get("Ulva lactuca").unwrap();
        let breakdown = evaluate(&record(30.0, 6.0, 3.0), ulva, &ModelConstants::default());
        assert_eq!(breakdown.temperature, 1.0);
        assert_eq!(breakdown.nutrient, 1.0);
        assert_eq!(breakdown.sunlight, 1.0);
        assert_eq!(breakdown.growth, 80.0);
    }

    #[test]
    fn test_hostile_conditions_hit_floor_but_not_zero() {
        let table = SpeciesTable::builtin();
        let ulva = table.get("Ulva lactuca").unwrap();
        let g = growth(&record(-40.0, 40.0, 50.0), ulva);
        assert!(g > 0.0);
        assert!((g - 0.00008).abs() < 1e-15);
        assert!((g - ModelConstants::default().min_growth()).abs() < 1e-15);
    }

    #[test]
    fn test_growth_bounds_for_all_builtin_species() {
        let table = SpeciesTable::builtin();
        let constants = ModelConstants::default();
        let lower = constants.min_growth() * (1.0 - 1e-12);
        for id in ["Ulva lactuca", "Hypnea musciformis", "Caulerpa racemosa"] {
            let profile = table.get(id).unwrap();
            for temp in [10.0, 22.5, 28.0, 33.0, 45.0] {
                for sun in [0.0, 3.5, 6.0, 9.0, 14.0] {
                    for nut in [0.0, 1.5, 2.8, 4.0, 12.0] {
                        let g = evaluate(&record(temp, sun, nut), profile, &constants).growth;
                        assert!(g >= lower && g <= 80.0, "{} {} {} {} -> {}", id, temp, sun, nut, g);
                    }
                }
            }
        }
    }

    #[test]
    fn test_partial_suitability_multiplies() {
        let table = SpeciesTable::builtin();
        let ulva = table.get("Ulva lactuca").unwrap();
        // temp 5 off of tolerance 25 -> 0.8, nutrient 1 off of 5 -> 0.8, sunlight 2 off of 8 -> 0.75
        let g = growth(&record(25.0, 8.0, 2.0), ulva);
        assert!((g - 80.0 * 0.8 * 0.8 * 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_constants_validation() {
        assert!(ModelConstants::default().validate().is_ok());
        let leaky = ModelConstants {
            retention: 1.0,
            ..ModelConstants::default()
        };
        assert!(leaky.validate().is_err());
        let flat = ModelConstants {
            base_rate: 0.0,
            ..ModelConstants::default()
        };
        assert!(flat.validate().is_err());
    }
}
