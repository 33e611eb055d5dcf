use crate::domain::model::{LoanRecord, QuoteBatch};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn batch_name(&self) -> &str;
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn include_schedule(&self) -> bool;
    fn skip_invalid(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<LoanRecord>>;
    async fn transform(&self, records: Vec<LoanRecord>) -> Result<QuoteBatch>;
    async fn load(&self, batch: QuoteBatch) -> Result<String>;
}
