use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's extract, transform and load phases in order, stopping at the first error.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        let started = Instant::now();
        tracing::info!("🚀 Starting {} pipeline", name);

        let phase = Instant::now();
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extract finished in {:?}", phase.elapsed());

        let phase = Instant::now();
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!("Transform finished in {:?}", phase.elapsed());

        let phase = Instant::now();
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Load finished in {:?}", phase.elapsed());

        tracing::info!(
            "✅ {} pipeline completed in {:?}, output: {}",
            name,
            started.elapsed(),
            output_path
        );
        Ok(output_path)
    }
}
