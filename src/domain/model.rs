use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_f64, validate_positive_f64, validate_range};
use serde::{Deserialize, Serialize};

/// 可接受的最長年期；攤還明細最多 1200 期
pub const MAX_TERM_YEARS: u32 = 100;

/// 貸款條件：本金、年利率（百分比）、年期
///
/// 透過 [`LoanTerms::new`] 建立時即完成驗證，建立後不可變更。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    principal: f64,
    annual_rate_percent: f64,
    years: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, years: u32) -> Result<Self> {
        validate_positive_f64("principal", principal)?;
        validate_non_negative_f64("annual_rate_percent", annual_rate_percent)?;
        validate_range("years", years, 1, MAX_TERM_YEARS)?;

        Ok(Self {
            principal,
            annual_rate_percent,
            years,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    /// 月利率（小數），例如 6.5% 年利率 => 0.065 / 12
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    pub fn months(&self) -> u32 {
        self.years * 12
    }
}

/// CSV 輸入的一筆原始資料，尚未驗證
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

impl LoanRecord {
    pub fn to_terms(&self) -> Result<LoanTerms> {
        LoanTerms::new(self.principal, self.annual_rate_percent, self.years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanQuote {
    pub id: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
    pub monthly_payment: f64,
    pub total_cost: f64,
    pub total_interest: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<LoanQuote>,
    pub rejected: Vec<RejectedRecord>,
}
