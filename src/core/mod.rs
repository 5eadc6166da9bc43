pub mod accumulator;
pub mod driver;
pub mod etl;
pub mod growth;
pub mod nutrient;
pub mod species;
pub mod suitability;

pub use crate::domain::model::{BiomassSeries, ClimateRecord, ClimateTable, SimulationOutput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
