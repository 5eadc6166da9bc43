use crate::config::toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

/// Command line of the simulation binary. Flags override the configuration file.
#[derive(Debug, Clone, Parser)]
#[command(name = "algae-biomass")]
#[command(about = "Monthly macro-algae biomass simulation from climate drivers")]
pub struct CliConfig {
    /// TOML configuration file (defaults to ./algae-config.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Climate table to read
    #[arg(long)]
    pub input: Option<String>,

    /// Where to write the table with biomass columns
    #[arg(long)]
    pub output: Option<String>,

    /// Seed for the synthesized nutrient series
    #[arg(long)]
    pub seed: Option<u64>,

    /// Species to simulate, comma separated
    #[arg(long, value_delimiter = ',')]
    pub species: Vec<String>,

    /// Run species on a thread pool
    #[arg(long)]
    pub parallel: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    /// Loads the configuration file (explicit path, else the default file if it exists,
    /// else built-in defaults) and applies command line overrides.
    pub fn load(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                TomlConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(input) = &self.input {
            config.simulation.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            config.simulation.output_path = output.clone();
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if !self.species.is_empty() {
            config.simulation.species = self.species.iter().map(|s| s.trim().to_string()).collect();
        }
        if self.parallel {
            config.simulation.parallel = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_values() {
        let cli = CliConfig::parse_from([
            "algae-biomass",
            "--input",
            "site.csv",
            "--seed",
            "99",
            "--species",
            "Ulva lactuca, Caulerpa racemosa",
            "--parallel",
        ]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.simulation.input_path, "site.csv");
        assert_eq!(config.simulation.seed, 99);
        assert_eq!(
            config.simulation.species,
            vec!["Ulva lactuca", "Caulerpa racemosa"]
        );
        assert!(config.simulation.parallel);
        assert_eq!(
            config.simulation.output_path,
            "data/odisha_climate_with_biomass.csv"
        );
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = CliConfig::parse_from(["algae-biomass"]);
        let mut config = TomlConfig::default();
        config.simulation.parallel = true;
        cli.apply_overrides(&mut config);
        assert!(config.simulation.parallel);
        assert_eq!(config.simulation.species.len(), 3);
    }
}
