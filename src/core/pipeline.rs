use crate::core::cache::MemoizedCalculator;
use crate::core::{ConfigProvider, LoanQuote, LoanRecord, Pipeline, QuoteBatch, Storage};
use crate::domain::model::RejectedRecord;
use crate::utils::error::{CalcError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};

pub const QUOTES_CSV: &str = "quotes.csv";
pub const QUOTES_JSON: &str = "quotes.json";
pub const REJECTED_JSON: &str = "rejected.json";

/// CSV 輸出欄位（不含攤還明細）
#[derive(Serialize)]
struct QuoteCsvRow<'a> {
    id: &'a str,
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
    monthly_payment: f64,
    total_cost: f64,
    total_interest: f64,
}

impl<'a> From<&'a LoanQuote> for QuoteCsvRow<'a> {
    fn from(quote: &'a LoanQuote) -> Self {
        Self {
            id: &quote.id,
            principal: quote.principal,
            annual_rate_percent: quote.annual_rate_percent,
            years: quote.years,
            monthly_payment: quote.monthly_payment,
            total_cost: quote.total_cost,
            total_interest: quote.total_interest,
        }
    }
}

#[derive(Serialize)]
struct QuoteReport<'a> {
    batch: &'a str,
    generated_at: DateTime<Utc>,
    count: usize,
    quotes: &'a [LoanQuote],
}

pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    calculator: Arc<MemoizedCalculator>,
    // extract 階段無法解析的資料列，transform 時併入 rejected
    unparsed: Mutex<Vec<RejectedRecord>>,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::with_calculator(storage, config, Arc::new(MemoizedCalculator::new()))
    }

    pub fn with_calculator(storage: S, config: C, calculator: Arc<MemoizedCalculator>) -> Self {
        Self {
            storage,
            config,
            calculator,
            unparsed: Mutex::new(Vec::new()),
        }
    }

    pub fn calculator(&self) -> &MemoizedCalculator {
        &self.calculator
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    fn render_csv(quotes: &[LoanQuote]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for quote in quotes {
            writer.serialize(QuoteCsvRow::from(quote))?;
        }
        writer
            .into_inner()
            .map_err(|e| CalcError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<LoanRecord>> {
        tracing::debug!("Reading loan records from: {}", self.config.input_file());
        let data = self.storage.read_file(self.config.input_file()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        let mut unparsed = Vec::new();

        // 欄位數錯誤等結構問題直接失敗；單列的值無法解析則視 skip_invalid 處理
        for row in reader.records() {
            let row = row?;
            match row.deserialize::<LoanRecord>(Some(&headers)) {
                Ok(record) => records.push(record),
                Err(e) if self.config.skip_invalid() => {
                    let id = match row.get(0) {
                        Some(id) if !id.is_empty() => id.to_string(),
                        _ => format!(
                            "line {}",
                            row.position().map(|p| p.line()).unwrap_or_default()
                        ),
                    };
                    tracing::warn!("Skipping unparsable row '{}': {}", id, e);
                    unparsed.push(RejectedRecord {
                        id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        *self.unparsed.lock().unwrap_or_else(|e| e.into_inner()) = unparsed;

        if records.is_empty() {
            tracing::warn!("Input file {} contains no loan records", self.config.input_file());
        }

        Ok(records)
    }

    async fn transform(&self, records: Vec<LoanRecord>) -> Result<QuoteBatch> {
        let unparsed = {
            let mut guard = self.unparsed.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };
        let mut batch = QuoteBatch {
            quotes: Vec::new(),
            rejected: unparsed,
        };
        let with_schedule = self.config.include_schedule();

        for record in records {
            let quoted = record
                .to_terms()
                .and_then(|terms| self.calculator.quote(&record.id, &terms, with_schedule));

            match quoted {
                Ok(quote) => batch.quotes.push(quote),
                Err(e) if self.config.skip_invalid() => {
                    tracing::warn!("Skipping loan '{}': {}", record.id, e);
                    batch.rejected.push(RejectedRecord {
                        id: record.id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Loan '{}' failed: {}", record.id, e);
                    return Err(e);
                }
            }
        }

        tracing::debug!(
            "Cache stats - hits: {}, misses: {}",
            self.calculator.hits(),
            self.calculator.misses()
        );

        Ok(batch)
    }

    async fn load(&self, batch: QuoteBatch) -> Result<String> {
        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    let data = Self::render_csv(&batch.quotes)?;
                    let path = self.output_file(QUOTES_CSV);
                    tracing::debug!("Writing {} ({} bytes)", path, data.len());
                    self.storage.write_file(&path, &data).await?;
                }
                "json" => {
                    let report = QuoteReport {
                        batch: self.config.batch_name(),
                        generated_at: Utc::now(),
                        count: batch.quotes.len(),
                        quotes: &batch.quotes,
                    };
                    let data = serde_json::to_vec_pretty(&report)?;
                    let path = self.output_file(QUOTES_JSON);
                    tracing::debug!("Writing {} ({} bytes)", path, data.len());
                    self.storage.write_file(&path, &data).await?;
                }
                other => {
                    return Err(CalcError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    });
                }
            }
        }

        if !batch.rejected.is_empty() {
            let data = serde_json::to_vec_pretty(&batch.rejected)?;
            self.storage
                .write_file(&self.output_file(REJECTED_JSON), &data)
                .await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
