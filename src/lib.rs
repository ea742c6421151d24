//! # Financial Ratio Builder
//!
//! A library for turning the loosely-typed line items of a Korean financial
//! statement (as served by the Open DART API) into a small set of canonical
//! accounts, and deriving standard financial ratios from them.
//!
//! ## Core Concepts
//!
//! - **Line Items**: One reported fact: free-text Korean account name, statement code
//!   (`BS`/`IS`), current and prior amounts
//! - **Classified Statement**: Display-oriented buckets (assets, liabilities, equity,
//!   revenue, profit, expenses) built from substring rules
//! - **Canonical Accounts**: The eight accounts ratio math reads, each present or absent,
//!   first match wins
//! - **Ratio Report**: Profitability, stability, growth and activity ratios. A ratio whose
//!   input is missing or whose denominator is not positive is omitted, never zero
//! - **Yearly Ratio Table**: One independent report per fiscal year, for trend display
//!
//! The pipeline never fails: sparse or malformed input degrades to fewer ratios.
//!
//! ## Example
//!
//! ```rust
//! use financial_ratio_builder::*;
//!
//! let items = vec![
//!     LineItem::new("자산총계", StatementType::BalanceSheet, 1_000_000, 900_000),
//!     LineItem::new("자본총계", StatementType::BalanceSheet, 600_000, 520_000),
//!     LineItem::new("매출액", StatementType::IncomeStatement, 800_000, 750_000),
//!     LineItem::new("당기순이익", StatementType::IncomeStatement, 80_000, 70_000),
//! ];
//!
//! let report = analyze_statement(&items);
//! assert!((report.value(RatioKey::Roa).unwrap() - 8.0).abs() < 1e-9);
//! assert!(report.get(RatioKey::CurrentRatio).is_none());
//! ```

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod ingestion;
pub mod ratios;
pub mod report;
pub mod rules;
pub mod schema;

#[cfg(feature = "dart")]
pub mod dart;

pub use aggregator::{ratio_trend, AccountTrend, RatioTrend};
pub use classifier::{AccountBucket, ClassifiedStatement};
pub use error::{FinancialRatioError, Result};
pub use ingestion::*;
pub use ratios::{compute_ratios, growth_rate};
pub use report::{format_krw, summarize_for_narration, yearly_table_to_csv};
pub use rules::{AccountRules, Bucket, BucketRule, CanonicalRule};
pub use schema::*;

#[cfg(feature = "dart")]
pub use dart::DartClient;

use log::info;
use std::collections::BTreeMap;

/// The normalization and ratio pipeline bound to one set of matching rules.
///
/// Holds no state besides the rules, so one value can be shared freely across
/// threads or built per request.
#[derive(Debug, Clone, Default)]
pub struct RatioPipeline {
    rules: AccountRules,
}

impl RatioPipeline {
    pub fn new(rules: AccountRules) -> Self {
        Self { rules }
    }

    /// Loads and validates rules from JSON.
    pub fn from_rules_json(json: &str) -> Result<Self> {
        Ok(Self::new(AccountRules::from_json(json)?))
    }

    pub fn rules(&self) -> &AccountRules {
        &self.rules
    }

    pub fn classify(&self, items: &[LineItem]) -> ClassifiedStatement {
        ClassifiedStatement::classify(items, &self.rules)
    }

    pub fn extract_canonical(&self, items: &[LineItem]) -> CanonicalAccounts {
        extractor::extract_canonical_with(items, &self.rules)
    }

    pub fn analyze(&self, items: &[LineItem]) -> RatioReport {
        info!("Analyzing statement with {} line items", items.len());
        compute_ratios(&self.extract_canonical(items))
    }

    pub fn analyze_multi_year(&self, by_year: &BTreeMap<i32, Vec<LineItem>>) -> YearlyRatioTable {
        aggregator::compute_multi_year_with(by_year, &self.rules)
    }

    pub fn account_trend(
        &self,
        by_year: &BTreeMap<i32, Vec<LineItem>>,
        key: CanonicalKey,
    ) -> AccountTrend {
        aggregator::account_trend_with(by_year, key, &self.rules)
    }

    pub fn parse_response(&self, response: &DartResponse) -> ParsedStatement {
        ParsedStatement::from_response(response, &self.rules)
    }
}

pub fn classify(items: &[LineItem]) -> ClassifiedStatement {
    RatioPipeline::default().classify(items)
}

pub fn extract_canonical(items: &[LineItem]) -> CanonicalAccounts {
    RatioPipeline::default().extract_canonical(items)
}

/// Extraction followed by [`compute_ratios`], with the default rules.
pub fn analyze_statement(items: &[LineItem]) -> RatioReport {
    RatioPipeline::default().analyze(items)
}

pub fn compute_multi_year(by_year: &BTreeMap<i32, Vec<LineItem>>) -> YearlyRatioTable {
    RatioPipeline::default().analyze_multi_year(by_year)
}

pub fn account_trend(by_year: &BTreeMap<i32, Vec<LineItem>>, key: CanonicalKey) -> AccountTrend {
    RatioPipeline::default().account_trend(by_year, key)
}
