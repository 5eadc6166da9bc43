use crate::adapters::power::{PowerRequest, POWER_ENDPOINT};
use crate::core::driver::{self, DEFAULT_LOG_INTERVAL};
use crate::core::growth::ModelConstants;
use crate::core::nutrient::{DEFAULT_NUTRIENT_LOW, DEFAULT_NUTRIENT_SPAN, DEFAULT_SEED};
use crate::core::species::{ProfileSpec, SpeciesTable};
use crate::core::ConfigProvider;
use crate::utils::error::{AlgaeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "algae-config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub simulation: SimulationConfig,
    pub model: ModelConstants,
    /// Added to the built-in species table; an entry with a built-in id replaces it.
    pub profiles: Vec<ProfileSpec>,
    pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub input_path: String,
    pub output_path: String,
    pub seed: u64,
    pub nutrient_low: f64,
    pub nutrient_span: f64,
    pub species: Vec<String>,
    pub parallel: bool,
    pub log_interval: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            input_path: "data/odisha_climate.csv".to_string(),
            output_path: "data/odisha_climate_with_biomass.csv".to_string(),
            seed: DEFAULT_SEED,
            nutrient_low: DEFAULT_NUTRIENT_LOW,
            nutrient_span: DEFAULT_NUTRIENT_SPAN,
            species: SpeciesTable::builtin().ids().map(str::to_string).collect(),
            parallel: false,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub endpoint: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_year: i32,
    pub end_year: i32,
    pub community: String,
    pub timeout_seconds: u64,
    pub output_path: String,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        // Chilika lagoon
        Self {
            endpoint: POWER_ENDPOINT.to_string(),
            latitude: 19.72,
            longitude: 85.3,
            start_year: 2015,
            end_year: 2024,
            community: "AG".to_string(),
            timeout_seconds: 60,
            output_path: "data/odisha_climate.csv".to_string(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AlgaeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| AlgaeError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Built-in profiles overlaid with the `[[profiles]]` entries.
    pub fn species_table(&self) -> Result<SpeciesTable> {
        let mut table = SpeciesTable::builtin();
        table.extend_from_specs(self.profiles.iter().cloned())?;
        Ok(table)
    }

    pub fn power_request(&self) -> PowerRequest {
        PowerRequest {
            latitude: self.acquisition.latitude,
            longitude: self.acquisition.longitude,
            start_year: self.acquisition.start_year,
            end_year: self.acquisition.end_year,
            community: self.acquisition.community.clone(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        let sim = &self.simulation;
        validation::validate_path("simulation.input_path", &sim.input_path)?;
        validation::validate_path("simulation.output_path", &sim.output_path)?;
        validation::validate_range("simulation.nutrient_low", sim.nutrient_low, f64::MIN, f64::MAX)?;
        validation::validate_range("simulation.nutrient_span", sim.nutrient_span, 0.0, f64::MAX)?;
        validation::validate_positive_number("simulation.log_interval", sim.log_interval, 1)?;
        if sim.species.is_empty() {
            return Err(AlgaeError::MissingConfigError {
                field: "simulation.species".to_string(),
            });
        }

        driver::ensure_distinct_species(&sim.species)?;
        self.model.validate()?;

        // surfaces unknown species and invalid profiles before any data is read
        self.species_table()?.select(&sim.species)?;

        let acq = &self.acquisition;
        validation::validate_url("acquisition.endpoint", &acq.endpoint)?;
        validation::validate_path("acquisition.output_path", &acq.output_path)?;
        validation::validate_range("acquisition.latitude", acq.latitude, -90.0, 90.0)?;
        validation::validate_range("acquisition.longitude", acq.longitude, -180.0, 180.0)?;
        validation::validate_range(
            "acquisition.start_year",
            acq.start_year,
            1981,
            acq.end_year,
        )?;
        validation::validate_non_empty_string("acquisition.community", &acq.community)?;
        validation::validate_positive_number(
            "acquisition.timeout_seconds",
            acq.timeout_seconds as usize,
            1,
        )?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.simulation.input_path
    }

    fn output_path(&self) -> &str {
        &self.simulation.output_path
    }

    fn species(&self) -> &[String] {
        &self.simulation.species
    }

    fn seed(&self) -> u64 {
        self.simulation.seed
    }

    fn nutrient_low(&self) -> f64 {
        self.simulation.nutrient_low
    }

    fn nutrient_span(&self) -> f64 {
        self.simulation.nutrient_span
    }

    fn model_constants(&self) -> ModelConstants {
        self.model
    }

    fn parallel(&self) -> bool {
        self.simulation.parallel
    }

    fn log_interval(&self) -> usize {
        self.simulation.log_interval
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.model, ModelConstants::default());
        assert_eq!(
            config.simulation.species,
            vec!["Ulva lactuca", "Hypnea musciformis", "Caulerpa racemosa"]
        );
        assert_eq!(config.acquisition.start_year, 2015);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[simulation]
input_path = "in.csv"
output_path = "out/biomass.csv"
seed = 7
species = ["Ulva lactuca", "Gracilaria edulis"]
parallel = true

[model]
retention = 0.85

[[profiles]]
id = "Gracilaria edulis"
temp_optimum = 27.0
temp_tolerance = 20.0
nutrient_optimum = 2.5
nutrient_tolerance = 3.0
sunlight_optimum = 6.5
sunlight_tolerance = 7.0

[acquisition]
latitude = 9.28
longitude = 79.12
start_year = 2018
end_year = 2020
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "in.csv");
        assert_eq!(config.seed(), 7);
        assert!(config.parallel());
        assert_eq!(config.model.retention, 0.85);
        assert_eq!(config.model.base_rate, 80.0);
        assert_eq!(config.log_interval(), 12);
        assert!(config.validate().is_ok());

        let table = config.species_table().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get("Gracilaria edulis").unwrap().sunlight().optimum(),
            6.5
        );
        assert_eq!(config.power_request().start_year, 2018);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ALGAE_TEST_OUTPUT", "/tmp/algae-out.csv");

        let toml_content = r#"
[simulation]
output_path = "${ALGAE_TEST_OUTPUT}"
input_path = "${ALGAE_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.simulation.output_path, "/tmp/algae-out.csv");
        assert_eq!(config.simulation.input_path, "${ALGAE_TEST_UNSET_VARIABLE}");

        std::env::remove_var("ALGAE_TEST_OUTPUT");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            "[model]\nretention = 1.5\n",
            "[simulation]\nspecies = [\"Sargassum\"]\n",
            "[simulation]\nspecies = []\n",
            "[acquisition]\nendpoint = \"invalid-url\"\n",
            "[acquisition]\nstart_year = 2025\nend_year = 2020\n",
            "[[profiles]]\nid = \"Bad\"\ntemp_optimum = 1.0\ntemp_tolerance = 0.0\n\
             nutrient_optimum = 1.0\nnutrient_tolerance = 1.0\n\
             sunlight_optimum = 1.0\nsunlight_tolerance = 1.0\n",
        ];
        for case in cases {
            let config = TomlConfig::from_toml_str(case).unwrap();
            assert!(config.validate().is_err(), "accepted: {}", case);
        }
    }

    #[test]
    fn test_repeated_species_fails_validation() {
        let config = TomlConfig::from_toml_str(
            "[simulation]\nspecies = [\"Ulva lactuca\", \"Ulva lactuca\"]\n",
        )
        .unwrap();
        let err = config.validate_config().unwrap_err();
        assert!(matches!(
            err,
            AlgaeError::InvalidConfigValueError { ref field, .. } if field == "simulation.species"
        ));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[simulation\nseed = ").unwrap_err();
        assert!(matches!(err, AlgaeError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[simulation]\nseed = 1234\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.seed(), 1234);
    }
}
