pub mod cache;
pub mod calculator;
pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{LoanQuote, LoanRecord, LoanTerms, QuoteBatch};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
