//! Biomass accumulator: a first-order leaky integrator over monthly growth.

use crate::core::growth::{self, GrowthBreakdown, ModelConstants};
use crate::core::species::SpeciesProfile;
use crate::domain::model::ClimateRecord;

/// Running biomass of one species over one climate sequence.
///
/// Starts at zero and is bound to a single profile; a new run needs a new accumulator.
/// `step` is not idempotent: every call advances the state by one month.
#[derive(Debug)]
pub struct BiomassAccumulator<'a> {
    profile: &'a SpeciesProfile,
    constants: &'a ModelConstants,
    biomass: f64,
    steps: usize,
}

/// Result of one month's update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub growth: GrowthBreakdown,
    pub biomass: f64,
}

impl<'a> BiomassAccumulator<'a> {
    pub fn new(profile: &'a SpeciesProfile, constants: &'a ModelConstants) -> Self {
        Self {
            profile,
            constants,
            biomass: 0.0,
            steps: 0,
        }
    }

    /// `biomass' = biomass * retention + growth(record)`
    pub fn step(&mut self, record: &ClimateRecord) -> StepOutcome {
        let growth = growth::evaluate(record, self.profile, self.constants);
        self.biomass = self.biomass * self.constants.retention + growth.growth;
        self.steps += 1;
        StepOutcome {
            growth,
            biomass: self.biomass,
        }
    }

    pub fn biomass(&self) -> f64 {
        self.biomass
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::SpeciesTable;
    use chrono::NaiveDate;

    fn record(month: u32, temp_max: f64, sunlight: f64, nutrient: f64) -> ClimateRecord {
        ClimateRecord {
            date: NaiveDate::from_ymd_opt(2015, month, 1).unwrap(),
            temp_max,
            sunlight,
            nutrient,
        }
    }

    #[test]
    fn test_ulva_two_ideal_months() {
        let table = SpeciesTable::builtin();
        let constants = ModelConstants::default();
        let mut acc = BiomassAccumulator::new(table.get("Ulva lactuca").unwrap(), &constants);
        assert_eq!(acc.biomass(), 0.0);

        let ideal = record(1, 30.0, 6.0, 3.0);
        let first = acc.step(&ideal);
        assert_eq!(first.growth.growth, 80.0);
        assert_eq!(first.biomass, 80.0);

        let second = acc.step(&ideal);
        assert!((second.biomass - 152.0).abs() < 1e-9);
        assert_eq!(acc.steps(), 2);
    }

    #[test]
    fn test_biomass_stays_non_negative() {
        let table = SpeciesTable::builtin();
        let constants = ModelConstants::default();
        let mut acc = BiomassAccumulator::new(table.get("Caulerpa racemosa").unwrap(), &constants);
        let temps = [-10.0, 5.0, 18.0, 32.0, 60.0, 27.0];
        for (i, temp) in temps.iter().cycle().take(48).enumerate() {
            let month = (i % 12) as u32 + 1;
            let outcome = acc.step(&record(month, *temp, (i % 9) as f64, (i % 5) as f64));
            assert!(outcome.biomass >= 0.0);
            assert!(outcome.growth.growth > 0.0);
        }
    }

    #[test]
    fn test_converges_to_steady_state() {
        // constant forcing g settles at g / (1 - retention)
        let table = SpeciesTable::builtin();
        let constants = ModelConstants::default();
        let mut acc = BiomassAccumulator::new(table.get("Ulva lactuca").unwrap(), &constants);
        let ideal = record(1, 30.0, 6.0, 3.0);
        for _ in 0..400 {
            acc.step(&ideal);
        }
        assert!((acc.biomass() - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_accumulators_do_not_share_state() {
        let table = SpeciesTable::builtin();
        let constants = ModelConstants::default();
        let profile = table.get("Hypnea musciformis").unwrap();
        let r = record(3, 28.0, 7.0, 2.8);

        let mut first = BiomassAccumulator::new(profile, &constants);
        first.step(&r);
        first.step(&r);

        let mut second = BiomassAccumulator::new(profile, &constants);
        assert_eq!(second.biomass(), 0.0);
        assert_eq!(second.step(&r).biomass, 80.0);
    }
}
