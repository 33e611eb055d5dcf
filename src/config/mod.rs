pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::LoanTerms;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

/// 單筆貸款計算的命令列參數
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "mortgage-cost")]
#[command(about = "Compute the total cost of an amortized fixed-rate loan")]
pub struct CliConfig {
    /// Borrowed amount, in currency units
    #[arg(long, allow_negative_numbers = true)]
    pub principal: f64,

    /// Nominal annual interest rate in percent (6.5 means 6.5%)
    #[arg(long, allow_negative_numbers = true)]
    pub rate: f64,

    /// Loan term in whole years
    #[arg(long)]
    pub years: u32,

    #[arg(long, help = "Print the month-by-month amortization schedule")]
    pub schedule: bool,

    #[arg(long, help = "Print the quote as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn terms(&self) -> Result<LoanTerms> {
        LoanTerms::new(self.principal, self.rate, self.years)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_args() {
        let config = CliConfig::parse_from([
            "mortgage-cost",
            "--principal",
            "250000",
            "--rate",
            "6.5",
            "--years",
            "5",
            "--json",
        ]);

        assert_eq!(config.principal, 250_000.0);
        assert_eq!(config.years, 5);
        assert!(config.json);
        assert!(!config.schedule);
        assert_eq!(config.terms().unwrap().months(), 60);
    }

    #[test]
    fn test_terms_rejects_bad_principal() {
        let config = CliConfig::parse_from([
            "mortgage-cost",
            "--principal=-1",
            "--rate",
            "6.5",
            "--years",
            "5",
        ]);
        assert!(config.terms().is_err());
    }

    #[test]
    fn test_terms_rejects_term_too_long_for_schedule() {
        let config = CliConfig::parse_from([
            "mortgage-cost",
            "--principal",
            "1000",
            "--rate",
            "5",
            "--years",
            "300000000",
            "--schedule",
        ]);
        assert!(matches!(
            config.terms(),
            Err(crate::utils::error::CalcError::InvalidInput { .. })
        ));
    }
}
