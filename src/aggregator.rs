use crate::extractor::extract_canonical_with;
use crate::ratios::compute_ratios;
use crate::rules::AccountRules;
use crate::schema::{CanonicalKey, LineItem, RatioCategory, RatioKey, RatioUnit, YearlyRatioTable};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runs extraction and the ratio engine for each year on its own.
///
/// Every year in `by_year` gets an entry, including years whose items yield no
/// ratios at all. Nothing is carried between years.
pub fn compute_multi_year_with(
    by_year: &BTreeMap<i32, Vec<LineItem>>,
    rules: &AccountRules,
) -> YearlyRatioTable {
    info!("Computing ratios for {} fiscal years", by_year.len());

    by_year
        .iter()
        .map(|(year, items)| {
            let accounts = extract_canonical_with(items, rules);
            let report = compute_ratios(&accounts);
            debug!(
                "FY{}: {} items, {} canonical accounts, {} ratios",
                year,
                items.len(),
                accounts.present_keys().len(),
                report.len()
            );
            (*year, report)
        })
        .collect()
}

/// One ratio across years, ready for a trend chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioTrend {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
    pub display_name: Option<String>,
    pub unit: Option<RatioUnit>,
}

/// Collects `key` from every year that has it, in ascending year order.
/// Years where the ratio was omitted are skipped rather than zero-filled.
pub fn ratio_trend(table: &YearlyRatioTable, category: RatioCategory, key: RatioKey) -> RatioTrend {
    let mut trend = RatioTrend::default();

    for (year, report) in table {
        if let Some(ratio) = report.family(category).get(&key) {
            trend.years.push(*year);
            trend.values.push(ratio.value);
            if trend.display_name.is_none() {
                trend.display_name = Some(ratio.display_name.clone());
                trend.unit = Some(ratio.unit);
            }
        }
    }

    trend
}

/// Current-period amount of one canonical account per year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTrend {
    pub key: Option<CanonicalKey>,
    pub years: Vec<i32>,
    /// `None` where the account was not found for that year.
    pub values: Vec<Option<i64>>,
}

pub fn account_trend_with(
    by_year: &BTreeMap<i32, Vec<LineItem>>,
    key: CanonicalKey,
    rules: &AccountRules,
) -> AccountTrend {
    let mut trend = AccountTrend {
        key: Some(key),
        ..AccountTrend::default()
    };

    for (year, items) in by_year {
        let accounts = extract_canonical_with(items, rules);
        trend.years.push(*year);
        trend.values.push(accounts.get(key).map(|pair| pair.current));
    }

    trend
}
