use crate::utils::error::{AlgaeError, Result};
use chrono::{Datelike, Month, NaiveDate};

/// Column names of the flat monthly climate table.
pub mod columns {
    pub const MONTH: &str = "Month";
    pub const MONTH_NAME: &str = "Month_Name";
    pub const TEMP_MAX: &str = "TempMax_C";
    pub const RAIN: &str = "Rain_mm";
    pub const SUNLIGHT: &str = "Sunlight_h";
    pub const NUTRIENT: &str = "Nutrient";
}

/// Anything that sits on the monthly time axis.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One month of climate drivers, ready for simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateRecord {
    /// First day of the calendar month.
    pub date: NaiveDate,
    /// Maximum temperature, °C.
    pub temp_max: f64,
    /// Sunlight, hours/day.
    pub sunlight: f64,
    /// Nutrient concentration index.
    pub nutrient: f64,
}

impl Dated for ClimateRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// A delimited table kept as raw strings so that columns we do not interpret
/// (e.g. `Rain_mm`) pass through to the output untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ClimateTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .ok_or_else(|| AlgaeError::MissingColumn {
                column: name.to_string(),
            })
    }
}

/// A raw table row tagged with its parsed month.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRow {
    pub date: NaiveDate,
    pub values: Vec<String>,
}

impl Dated for DatedRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomassPoint {
    pub date: NaiveDate,
    pub biomass: f64,
}

/// Biomass trajectory of one species, aligned 1:1 with the climate records it was run on.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomassSeries {
    pub species_id: String,
    pub points: Vec<BiomassPoint>,
}

impl BiomassSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.biomass)
    }
}

/// All species series of one simulation, in configured species order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOutput {
    pub series: Vec<BiomassSeries>,
}

impl SimulationOutput {
    pub fn get(&self, species_id: &str) -> Option<&BiomassSeries> {
        self.series.iter().find(|s| s.species_id == species_id)
    }

    pub fn species_ids(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.species_id.as_str())
    }
}

/// Parses a month key such as `2015-JAN`, `2015-Jan` or `2015-01` into the first day
/// of that month.
pub fn parse_month_key(key: &str) -> Option<NaiveDate> {
    let (year, month) = key.trim().split_once('-')?;
    let year: i32 = year.trim().parse().ok()?;
    let month = month.trim();
    let month_number = match month.parse::<u32>() {
        Ok(n) => n,
        Err(_) => month.parse::<Month>().ok()?.number_from_month(),
    };
    NaiveDate::from_ymd_opt(year, month_number, 1)
}

/// Three-letter upper-case month abbreviation (`JAN`).
pub fn month_abbreviation(date: NaiveDate) -> String {
    date.format("%b").to_string().to_uppercase()
}

/// Inverse of [`parse_month_key`] in the `YYYY-MON` form.
pub fn format_month_key(date: NaiveDate) -> String {
    format!("{}-{}", date.year(), month_abbreviation(date))
}
