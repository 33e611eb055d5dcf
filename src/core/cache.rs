use crate::core::calculator;
use crate::domain::model::{LoanQuote, LoanTerms};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// 以 f64 的位元表示作為 key，相同輸入必得相同結果
type CacheKey = (u64, u64, u32);

fn cache_key(terms: &LoanTerms) -> CacheKey {
    (
        terms.principal().to_bits(),
        terms.annual_rate_percent().to_bits(),
        terms.years(),
    )
}

/// 可跨執行緒共用的記憶化計算器
///
/// 只快取成功的結果；鎖只在查詢與寫入時持有，計算本身在鎖外進行。
#[derive(Debug, Default)]
pub struct MemoizedCalculator {
    cache: Mutex<HashMap<CacheKey, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoizedCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 月付金為快取值；總成本由它乘上月數，與純函式結果逐位元相同
    pub fn monthly_payment(&self, terms: &LoanTerms) -> Result<f64> {
        let key = cache_key(terms);

        if let Some(payment) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("cache hit for {:?}", terms);
            return Ok(payment);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let payment = calculator::monthly_payment(terms)?;

        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.insert(key, payment);
        }

        Ok(payment)
    }

    pub fn total_loan_cost(&self, terms: &LoanTerms) -> Result<f64> {
        let payment = self.monthly_payment(terms)?;
        Ok(payment * f64::from(terms.months()))
    }

    pub fn quote(&self, id: &str, terms: &LoanTerms, with_schedule: bool) -> Result<LoanQuote> {
        let payment = self.monthly_payment(terms)?;
        calculator::quote_with_payment(id, terms, payment, with_schedule)
    }

    fn lookup(&self, key: &CacheKey) -> Option<f64> {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
