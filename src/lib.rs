pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::{AcquisitionPipeline, SimulationPipeline};
pub use config::TomlConfig;
pub use crate::core::{driver::SimulationDriver, etl::EtlEngine, species::SpeciesTable};
pub use utils::error::{AlgaeError, Result};
