use crate::adapters::climate_csv::{self, format_value, parse_cell};
use crate::core::driver::{ensure_unique_months, sort_chronologically, SimulationDriver};
use crate::core::nutrient::{seeded_rng, NutrientSynthesizer};
use crate::core::species::SpeciesTable;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    columns, parse_month_key, ClimateRecord, ClimateTable, Dated, DatedRow, SimulationOutput,
};
use crate::utils::error::{AlgaeError, Result};
use chrono::NaiveDate;

const PREVIEW_MONTHS: usize = 5;

/// Enriched table plus the series it was built from.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub table: ClimateTable,
    pub output: SimulationOutput,
}

/// A data row with its numeric drivers parsed, still carrying the raw cells.
#[derive(Debug, Clone)]
struct ParsedRow {
    row: DatedRow,
    temp_max: f64,
    sunlight: f64,
    nutrient: Option<f64>,
}

impl Dated for ParsedRow {
    fn date(&self) -> NaiveDate {
        self.row.date
    }
}

/// Cell `idx` of a data row; a short row is reported like an empty cell.
fn cell<'r>(values: &'r [String], idx: usize, row: usize, column: &str) -> Result<&'r str> {
    values
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| AlgaeError::InvalidValue {
            row,
            column: column.to_string(),
            value: String::new(),
        })
}

/// Reads the monthly climate table, runs every configured species and writes the table
/// back out with one biomass column per species.
pub struct SimulationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    driver: SimulationDriver,
}

impl<S: Storage, C: ConfigProvider> SimulationPipeline<S, C> {
    pub fn new(storage: S, config: C, species_table: &SpeciesTable) -> Result<Self> {
        let driver =
            SimulationDriver::from_table(species_table, config.species(), config.model_constants())?
                .with_parallel(config.parallel())
                .with_log_interval(config.log_interval());
        Ok(Self {
            storage,
            config,
            driver,
        })
    }

    fn parse_rows(&self, table: &ClimateTable) -> Result<Vec<ParsedRow>> {
        let month_idx = table.column_index(columns::MONTH)?;
        let temp_idx = table.column_index(columns::TEMP_MAX)?;
        let sun_idx = table.column_index(columns::SUNLIGHT)?;
        let nutrient_idx = table.find_column(columns::NUTRIENT);

        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, values)| -> Result<ParsedRow> {
                let row_no = i + 1;
                let month = cell(values, month_idx, row_no, columns::MONTH)?;
                let date = parse_month_key(month).ok_or_else(|| AlgaeError::InvalidDate {
                    row: row_no,
                    value: month.to_string(),
                })?;
                let numeric = |idx: usize, column: &str| -> Result<f64> {
                    parse_cell(row_no, column, cell(values, idx, row_no, column)?)
                };
                let temp_max = numeric(temp_idx, columns::TEMP_MAX)?;
                let sunlight = numeric(sun_idx, columns::SUNLIGHT)?;
                let nutrient = nutrient_idx
                    .map(|idx| numeric(idx, columns::NUTRIENT))
                    .transpose()?;
                Ok(ParsedRow {
                    temp_max,
                    sunlight,
                    nutrient,
                    row: DatedRow {
                        date,
                        values: values.clone(),
                    },
                })
            })
            .collect()
    }

    fn log_preview(&self, output: &SimulationOutput) {
        for series in &output.series {
            let tail: Vec<String> = series
                .points
                .iter()
                .rev()
                .take(PREVIEW_MONTHS)
                .rev()
                .map(|p| format!("{}={:.2}", crate::domain::model::format_month_key(p.date), p.biomass))
                .collect();
            tracing::info!("📊 {} last months: {}", series.species_id, tail.join(", "));
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SimulationPipeline<S, C> {
    type Extracted = ClimateTable;
    type Transformed = SimulationResult;

    fn name(&self) -> &'static str {
        "simulation"
    }

    async fn extract(&self) -> Result<ClimateTable> {
        let path = self.config.input_path();
        tracing::info!("📁 Loading climate table from {}", path);
        let data = self.storage.read_file(path).await?;
        climate_csv::read_table(&data)
    }

    async fn transform(&self, table: ClimateTable) -> Result<SimulationResult> {
        if table.is_empty() {
            return Err(AlgaeError::EmptyInput);
        }
        for species in self.config.species() {
            if table.find_column(species).is_some() || species == columns::NUTRIENT {
                return Err(AlgaeError::ConfigError {
                    message: format!("input table already has a column named '{}'", species),
                });
            }
        }

        let mut rows = self.parse_rows(&table)?;
        sort_chronologically(&mut rows);
        ensure_unique_months(&rows)?;

        // synthesized in date order so that row order in the file cannot change the output
        let synthesized = rows.iter().all(|r| r.nutrient.is_none());
        let nutrients: Vec<f64> = if synthesized {
            tracing::info!(
                "No {} column, synthesizing nutrients with seed {}",
                columns::NUTRIENT,
                self.config.seed()
            );
            let synth = NutrientSynthesizer::new(self.config.nutrient_low(), self.config.nutrient_span());
            synth.generate(&mut seeded_rng(self.config.seed()), rows.len())
        } else {
            rows.iter().map(|r| r.nutrient.unwrap_or_default()).collect()
        };

        let records: Vec<ClimateRecord> = rows
            .iter()
            .zip(&nutrients)
            .map(|(r, &nutrient)| ClimateRecord {
                date: r.row.date,
                temp_max: r.temp_max,
                sunlight: r.sunlight,
                nutrient,
            })
            .collect();

        let output = self.driver.run(&records)?;

        let mut headers = table.headers.clone();
        if synthesized {
            headers.push(columns::NUTRIENT.to_string());
        }
        headers.extend(output.species_ids().map(str::to_string));
        let mut enriched = ClimateTable::new(headers);

        for (i, parsed) in rows.into_iter().enumerate() {
            let mut values = parsed.row.values;
            if synthesized {
                values.push(format_value(nutrients[i]));
            }
            for series in &output.series {
                let point = series.points[i];
                if point.date != parsed.row.date {
                    return Err(AlgaeError::ConfigError {
                        message: format!("series for {} is misaligned at row {}", series.species_id, i + 1),
                    });
                }
                values.push(format_value(point.biomass));
            }
            enriched.rows.push(values);
        }

        self.log_preview(&output);
        Ok(SimulationResult {
            table: enriched,
            output,
        })
    }

    async fn load(&self, result: SimulationResult) -> Result<String> {
        let path = self.config.output_path();
        let data = climate_csv::write_table(&result.table)?;
        tracing::debug!("Writing {} rows ({} bytes)", result.table.len(), data.len());
        self.storage.write_file(path, &data).await?;
        tracing::info!("✅ Biomass simulation saved to: {}", path);
        Ok(path.to_string())
    }
}
