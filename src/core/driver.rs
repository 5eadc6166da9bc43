//! Simulation driver.
//!
//! Replays the climate sequence once per species, each run on a fresh accumulator,
//! and returns one biomass series per species aligned with the (chronologically
//! ordered) input.

use crate::core::accumulator::BiomassAccumulator;
use crate::core::growth::ModelConstants;
use crate::core::species::{SpeciesProfile, SpeciesTable};
use crate::domain::model::{BiomassPoint, BiomassSeries, ClimateRecord, Dated, SimulationOutput};
use crate::utils::error::{AlgaeError, Result};
use rayon::prelude::*;
use std::collections::HashSet;

pub const DEFAULT_LOG_INTERVAL: usize = 12;

/// Stable sort by month. Returns `true` when the input was not already in order;
/// that case is logged, since the decay recurrence is only meaningful in date order.
pub fn sort_chronologically<T: Dated>(items: &mut [T]) -> bool {
    let ordered = items.windows(2).all(|w| w[0].date() <= w[1].date());
    if ordered {
        return false;
    }
    let first_break = items
        .windows(2)
        .position(|w| w[0].date() > w[1].date())
        .map(|i| i + 1)
        .unwrap_or_default();
    tracing::warn!(
        rows = items.len(),
        first_out_of_order_row = first_break + 1,
        "⚠️ Climate input is not in chronological order, sorting by month before simulating"
    );
    items.sort_by_key(|item| item.date());
    true
}

/// Rejects repeated months. Expects chronologically sorted input.
pub fn ensure_unique_months<T: Dated>(items: &[T]) -> Result<()> {
    match items.windows(2).find(|w| w[0].date() == w[1].date()) {
        Some(w) => Err(AlgaeError::DuplicateMonth {
            date: crate::domain::model::format_month_key(w[0].date()),
        }),
        None => Ok(()),
    }
}

/// Each species id may appear once; its series becomes one output column.
pub fn ensure_distinct_species<S: AsRef<str>>(species: &[S]) -> Result<()> {
    let mut seen = HashSet::new();
    match species.iter().map(AsRef::as_ref).find(|id| !seen.insert(*id)) {
        Some(id) => Err(AlgaeError::InvalidConfigValueError {
            field: "simulation.species".to_string(),
            value: id.to_string(),
            reason: "species listed more than once".to_string(),
        }),
        None => Ok(()),
    }
}

fn ensure_finite(records: &[ClimateRecord]) -> Result<()> {
    for (i, record) in records.iter().enumerate() {
        let fields = [
            ("temp_max", record.temp_max),
            ("sunlight", record.sunlight),
            ("nutrient", record.nutrient),
        ];
        if let Some((column, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AlgaeError::InvalidValue {
                row: i + 1,
                column: column.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SimulationDriver {
    profiles: Vec<SpeciesProfile>,
    constants: ModelConstants,
    parallel: bool,
    log_interval: usize,
}

impl SimulationDriver {
    pub fn new(profiles: Vec<SpeciesProfile>, constants: ModelConstants) -> Result<Self> {
        constants.validate()?;
        let ids: Vec<&str> = profiles.iter().map(SpeciesProfile::id).collect();
        ensure_distinct_species(&ids)?;
        Ok(Self {
            profiles,
            constants,
            parallel: false,
            log_interval: DEFAULT_LOG_INTERVAL,
        })
    }

    /// Driver over the named species of `table`, in the given order.
    pub fn from_table<S: AsRef<str>>(
        table: &SpeciesTable,
        species: &[S],
        constants: ModelConstants,
    ) -> Result<Self> {
        Self::new(table.select(species)?, constants)
    }

    /// Run species on the rayon pool instead of one after another.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval.max(1);
        self
    }

    /// Orders, checks and simulates. Any rejected record aborts the whole run; no
    /// partial series is returned.
    pub fn run(&self, records: &[ClimateRecord]) -> Result<SimulationOutput> {
        let mut records = records.to_vec();
        sort_chronologically(&mut records);
        ensure_unique_months(&records)?;
        ensure_finite(&records)?;

        let series: Vec<BiomassSeries> = if self.parallel {
            tracing::debug!("Running {} species in parallel", self.profiles.len());
            self.profiles
                .par_iter()
                .map(|profile| self.run_species(profile, &records))
                .collect()
        } else {
            self.profiles
                .iter()
                .map(|profile| self.run_species(profile, &records))
                .collect()
        };

        Ok(SimulationOutput { series })
    }

    /// One species over records that are already ordered and validated.
    pub fn run_species(&self, profile: &SpeciesProfile, records: &[ClimateRecord]) -> BiomassSeries {
        tracing::info!("🔬 Simulating {} over {} months", profile.id(), records.len());

        let mut accumulator = BiomassAccumulator::new(profile, &self.constants);
        let mut points = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let outcome = accumulator.step(record);
            if i % self.log_interval == 0 {
                tracing::info!(
                    "📅 {} {}: Temp={:.1}°C, Sun={:.1}h, Nut={:.1} → growth={:.2}, biomass={:.2}",
                    profile.id(),
                    crate::domain::model::format_month_key(record.date),
                    record.temp_max,
                    record.sunlight,
                    record.nutrient,
                    outcome.growth.growth,
                    outcome.biomass
                );
            }
            points.push(BiomassPoint {
                date: record.date,
                biomass: outcome.biomass,
            });
        }

        tracing::info!(
            species = profile.id(),
            steps = accumulator.steps(),
            final_biomass = accumulator.biomass(),
            "Finished species run"
        );

        BiomassSeries {
            species_id: profile.id().to_string(),
            points,
        }
    }
}
