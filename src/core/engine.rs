use crate::core::Pipeline;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: String,
    pub quoted: usize,
    pub rejected: usize,
}

pub struct CalculationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CalculationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting batch quote run");

        // Extract
        let records = self.pipeline.extract().await?;
        tracing::info!("Read {} loan records", records.len());

        // Transform
        let batch = self.pipeline.transform(records).await?;
        let quoted = batch.quotes.len();
        let rejected = batch.rejected.len();
        tracing::info!("Quoted {} loans, rejected {}", quoted, rejected);

        // Load
        let output_path = self.pipeline.load(batch).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            quoted,
            rejected,
        })
    }
}
