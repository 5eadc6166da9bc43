pub mod acquisition_pipeline;
pub mod simulation_pipeline;

pub use acquisition_pipeline::AcquisitionPipeline;
pub use simulation_pipeline::{SimulationPipeline, SimulationResult};
