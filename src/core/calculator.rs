//! 固定利率分期攤還貸款的總成本計算
//!
//! 標準公式：
//!
//! ```text
//! payment    = r * P / (1 - (1 + r)^(-n))
//! total_cost = payment * n
//! ```
//!
//! 其中 `r` 為月利率、`n` 為月數。分母以 `-expm1(-n * ln_1p(r))` 計算，
//! 極小利率下仍保有精度。`r == 0` 時分母為零，回傳
//! [`CalcError::ZeroInterestRate`]，不會產生看似有效的數值。

use crate::domain::model::{AmortizationRow, LoanQuote, LoanTerms};
use crate::utils::error::{CalcError, Result};

/// 以原始數值計算貸款總成本
pub fn total_loan_cost(principal: f64, annual_rate_percent: f64, years: u32) -> Result<f64> {
    let terms = LoanTerms::new(principal, annual_rate_percent, years)?;
    total_cost(&terms)
}

/// 每月固定還款金額
pub fn monthly_payment(terms: &LoanTerms) -> Result<f64> {
    let rate = terms.monthly_rate();
    if rate == 0.0 {
        return Err(CalcError::ZeroInterestRate);
    }

    let months = terms.months();
    let numerator = rate * terms.principal();
    let denominator = -(-f64::from(months) * rate.ln_1p()).exp_m1();

    if denominator == 0.0 {
        return Err(CalcError::DegenerateRate {
            annual_rate_percent: terms.annual_rate_percent(),
            months,
        });
    }

    let payment = numerator / denominator;
    if !payment.is_finite() {
        return Err(CalcError::DegenerateRate {
            annual_rate_percent: terms.annual_rate_percent(),
            months,
        });
    }

    Ok(payment)
}

pub fn total_cost(terms: &LoanTerms) -> Result<f64> {
    let payment = monthly_payment(terms)?;
    Ok(payment * f64::from(terms.months()))
}

/// 逐月攤還明細；最後一期餘額歸零以吸收浮點誤差
pub fn amortization_schedule(terms: &LoanTerms) -> Result<Vec<AmortizationRow>> {
    let payment = monthly_payment(terms)?;
    let rate = terms.monthly_rate();
    let months = terms.months();

    let mut balance = terms.principal();
    let mut rows = Vec::new();

    for month in 1..=months {
        let interest = balance * rate;
        let principal_paid = payment - interest;
        balance -= principal_paid;
        if month == months {
            balance = 0.0;
        }

        rows.push(AmortizationRow {
            month,
            payment,
            interest,
            principal: principal_paid,
            balance,
        });
    }

    Ok(rows)
}

/// 組合一筆完整報價
pub fn quote(id: &str, terms: &LoanTerms, with_schedule: bool) -> Result<LoanQuote> {
    let payment = monthly_payment(terms)?;
    quote_with_payment(id, terms, payment, with_schedule)
}

/// 以已算好的月付金組合報價（供快取使用）
pub(crate) fn quote_with_payment(
    id: &str,
    terms: &LoanTerms,
    payment: f64,
    with_schedule: bool,
) -> Result<LoanQuote> {
    let schedule = if with_schedule {
        Some(amortization_schedule(terms)?)
    } else {
        None
    };
    let total = payment * f64::from(terms.months());

    Ok(LoanQuote {
        id: id.to_string(),
        principal: terms.principal(),
        annual_rate_percent: terms.annual_rate_percent(),
        years: terms.years(),
        monthly_payment: payment,
        total_cost: total,
        total_interest: total - terms.principal(),
        schedule,
    })
}
