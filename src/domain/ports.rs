use crate::core::growth::ModelConstants;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Writes `data` so that `path` either keeps its previous content or holds all of
    /// `data`; a partially written file is never visible under `path`.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn species(&self) -> &[String];
    fn seed(&self) -> u64;
    fn nutrient_low(&self) -> f64;
    fn nutrient_span(&self) -> f64;
    fn model_constants(&self) -> ModelConstants;
    fn parallel(&self) -> bool;
    fn log_interval(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    fn name(&self) -> &'static str;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}
