pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    cache::MemoizedCalculator,
    calculator::{amortization_schedule, monthly_payment, total_loan_cost},
    engine::{CalculationEngine, RunSummary},
    pipeline::BatchPipeline,
};
pub use domain::model::{AmortizationRow, LoanQuote, LoanTerms, MAX_TERM_YEARS};
pub use utils::error::{CalcError, Result};
