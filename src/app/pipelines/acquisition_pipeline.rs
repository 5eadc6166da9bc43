use crate::adapters::climate_csv;
use crate::adapters::power::{self, PowerClient, PowerRequest};
use crate::core::{Pipeline, Storage};
use crate::domain::model::ClimateTable;
use crate::utils::error::Result;

/// Downloads monthly aggregates for one point and writes them as the flat climate table.
/// Nothing is written unless the whole payload was fetched and reshaped.
pub struct AcquisitionPipeline<S: Storage> {
    storage: S,
    client: PowerClient,
    request: PowerRequest,
    output_path: String,
}

impl<S: Storage> AcquisitionPipeline<S> {
    pub fn new(storage: S, client: PowerClient, request: PowerRequest, output_path: String) -> Self {
        Self {
            storage,
            client,
            request,
            output_path,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AcquisitionPipeline<S> {
    type Extracted = String;
    type Transformed = ClimateTable;

    fn name(&self) -> &'static str {
        "acquisition"
    }

    async fn extract(&self) -> Result<String> {
        self.client.fetch_monthly_csv(&self.request).await
    }

    async fn transform(&self, body: String) -> Result<ClimateTable> {
        let rows = power::parse_wide_csv(&body)?;
        let table = power::reshape(&rows)?;
        tracing::info!("Reshaped {} parameter rows into {} months", rows.len(), table.len());
        Ok(table)
    }

    async fn load(&self, table: ClimateTable) -> Result<String> {
        let data = climate_csv::write_table(&table)?;
        self.storage.write_file(&self.output_path, &data).await?;
        tracing::info!("✅ Saved to {}", self.output_path);
        Ok(self.output_path.clone())
    }
}
