//! Client for the NASA POWER monthly point API and the reshape of its wide CSV payload
//! (one row per parameter and year, one column per month) into the long monthly table.

use crate::adapters::climate_csv::format_value;
use crate::domain::model::{columns, ClimateTable};
use crate::utils::error::{AlgaeError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

pub const POWER_ENDPOINT: &str = "https://power.larc.nasa.gov/api/temporal/monthly/point";

/// Remote parameter name and the output column it becomes.
pub const PARAMETERS: [(&str, &str); 3] = [
    ("T2M_MAX", columns::TEMP_MAX),
    ("PRECTOTCORR", columns::RAIN),
    // all-sky surface shortwave flux, used as the sunlight driver
    ("ALLSKY_SFC_SW_DWN", columns::SUNLIGHT),
];

const HEADER_END_MARKER: &str = "-END HEADER-";
const FILL_VALUE: f64 = -999.0;
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PowerRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub start_year: i32,
    pub end_year: i32,
    pub community: String,
}

impl PowerRequest {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let parameters: Vec<&str> = PARAMETERS.iter().map(|(name, _)| *name).collect();
        vec![
            ("parameters", parameters.join(",")),
            ("community", self.community.clone()),
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start", self.start_year.to_string()),
            ("end", self.end_year.to_string()),
            ("format", "CSV".to_string()),
        ]
    }
}

#[derive(Debug, Deserialize)]
struct PowerErrorBody {
    #[serde(default)]
    messages: Vec<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Best-effort human readable reason from an error response body.
fn error_detail(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<PowerErrorBody>(body) {
        if !parsed.messages.is_empty() {
            return parsed.messages.join("; ");
        }
        if let Some(detail) = parsed.detail {
            return match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

pub struct PowerClient {
    client: Client,
    endpoint: String,
}

impl PowerClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetches the raw CSV body. Any non-success status is an error.
    pub async fn fetch_monthly_csv(&self, request: &PowerRequest) -> Result<String> {
        tracing::info!(
            "🌍 Fetching monthly climate data for ({}, {}), {}-{}",
            request.latitude,
            request.longitude,
            request.start_year,
            request.end_year
        );
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Remote response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AlgaeError::RemoteStatus {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        Ok(body)
    }
}

/// One parameter for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub parameter: String,
    pub year: i32,
    pub values: [f64; 12],
}

fn unexpected(message: impl Into<String>) -> AlgaeError {
    AlgaeError::UnexpectedPayload {
        message: message.into(),
    }
}

/// Parses the data section that follows the header block. Rows for parameters we did
/// not ask for, and the column header row, are skipped.
pub fn parse_wide_csv(body: &str) -> Result<Vec<WideRow>> {
    let (_, data) = body
        .split_once(HEADER_END_MARKER)
        .ok_or_else(|| unexpected(format!("missing '{}' marker", HEADER_END_MARKER)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.trim().as_bytes());

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let parameter = record.get(0).unwrap_or_default();
        if !PARAMETERS.iter().any(|(name, _)| *name == parameter) {
            continue;
        }
        if record.len() < 2 + MONTHS.len() {
            return Err(unexpected(format!(
                "data line {}: expected at least {} columns, found {}",
                line + 1,
                2 + MONTHS.len(),
                record.len()
            )));
        }
        let year: i32 = record[1]
            .parse()
            .map_err(|_| unexpected(format!("data line {}: bad year '{}'", line + 1, &record[1])))?;

        let mut values = [0.0; 12];
        for (m, slot) in values.iter_mut().enumerate() {
            let cell = &record[2 + m];
            let value: f64 = cell.parse().map_err(|_| {
                unexpected(format!(
                    "{} {}-{}: non-numeric value '{}'",
                    parameter, year, MONTHS[m], cell
                ))
            })?;
            if value == FILL_VALUE || !value.is_finite() {
                return Err(unexpected(format!(
                    "{} {}-{}: missing value ({})",
                    parameter, year, MONTHS[m], cell
                )));
            }
            *slot = value;
        }
        rows.push(WideRow {
            parameter: parameter.to_string(),
            year,
            values,
        });
    }

    if rows.is_empty() {
        return Err(unexpected("no parameter rows in payload"));
    }
    Ok(rows)
}

/// Wide rows to the long `Month, Month_Name, TempMax_C, Rain_mm, Sunlight_h` table,
/// in chronological order. Every parameter must cover the same set of years.
pub fn reshape(rows: &[WideRow]) -> Result<ClimateTable> {
    let mut by_parameter: BTreeMap<&str, BTreeMap<i32, &[f64; 12]>> = BTreeMap::new();
    for row in rows {
        let years = by_parameter.entry(row.parameter.as_str()).or_default();
        if years.insert(row.year, &row.values).is_some() {
            return Err(unexpected(format!(
                "{} has more than one row for {}",
                row.parameter, row.year
            )));
        }
    }

    let mut series = Vec::with_capacity(PARAMETERS.len());
    for (name, _) in PARAMETERS {
        let years = by_parameter
            .remove(name)
            .ok_or_else(|| unexpected(format!("parameter {} missing from payload", name)))?;
        series.push(years);
    }

    let years: Vec<i32> = series[0].keys().copied().collect();
    for (i, years_for_param) in series.iter().enumerate().skip(1) {
        if years_for_param.keys().ne(years.iter()) {
            return Err(unexpected(format!(
                "{} covers different years than {}",
                PARAMETERS[i].0, PARAMETERS[0].0
            )));
        }
    }

    let mut headers = vec![columns::MONTH.to_string(), columns::MONTH_NAME.to_string()];
    headers.extend(PARAMETERS.iter().map(|(_, column)| column.to_string()));
    let mut table = ClimateTable::new(headers);

    for year in &years {
        for (m, month) in MONTHS.iter().enumerate() {
            let mut row = vec![format!("{}-{}", year, month), month.to_string()];
            for years_for_param in &series {
                row.push(format_value(years_for_param[year][m]));
            }
            table.rows.push(row);
        }
    }

    tracing::debug!("Reshaped {} years into {} monthly rows", years.len(), table.len());
    Ok(table)
}
