//! Ratio engine.
//!
//! Every ratio is guarded the same way: both accounts must be present and the
//! denominator must be strictly positive, otherwise the ratio is left out of
//! the report. Missing inputs and bad denominators are not distinguished.

use crate::schema::{AmountPair, CanonicalAccounts, CanonicalKey, RatioKey, RatioReport};
use log::debug;

/// `numerator / denominator`, or `None` unless the denominator is > 0.
fn guarded_div(numerator: i64, denominator: i64) -> Option<f64> {
    if denominator > 0 {
        Some(numerator as f64 / denominator as f64)
    } else {
        None
    }
}

fn current_ratio_of(
    accounts: &CanonicalAccounts,
    numerator: CanonicalKey,
    denominator: CanonicalKey,
) -> Option<f64> {
    let num = accounts.get(numerator)?;
    let den = accounts.get(denominator)?;
    guarded_div(num.current, den.current)
}

fn percent_of(
    accounts: &CanonicalAccounts,
    numerator: CanonicalKey,
    denominator: CanonicalKey,
) -> Option<f64> {
    current_ratio_of(accounts, numerator, denominator).map(|r| r * 100.0)
}

/// Period-over-period change in percent, guarded on the prior amount.
///
/// The difference is taken in `f64`; opposite-sign amounts near the `i64`
/// limits would overflow an integer subtraction.
pub fn growth_rate(amounts: AmountPair) -> Option<f64> {
    if amounts.prior <= 0 {
        return None;
    }
    let prior = amounts.prior as f64;
    Some((amounts.current as f64 - prior) / prior * 100.0)
}

fn growth_of(accounts: &CanonicalAccounts, key: CanonicalKey) -> Option<f64> {
    accounts.get(key).and_then(growth_rate)
}

pub fn compute_ratios(accounts: &CanonicalAccounts) -> RatioReport {
    use CanonicalKey::*;

    let candidates = [
        // profitability
        (RatioKey::Roe, percent_of(accounts, NetIncome, TotalEquity)),
        (RatioKey::Roa, percent_of(accounts, NetIncome, TotalAssets)),
        (RatioKey::OperatingMargin, percent_of(accounts, OperatingProfit, Revenue)),
        (RatioKey::NetMargin, percent_of(accounts, NetIncome, Revenue)),
        // stability
        (RatioKey::DebtRatio, percent_of(accounts, TotalLiabilities, TotalEquity)),
        (RatioKey::EquityRatio, percent_of(accounts, TotalEquity, TotalAssets)),
        (RatioKey::CurrentRatio, percent_of(accounts, CurrentAssets, CurrentLiabilities)),
        // growth
        (RatioKey::RevenueGrowth, growth_of(accounts, Revenue)),
        (RatioKey::IncomeGrowth, growth_of(accounts, NetIncome)),
        (RatioKey::AssetGrowth, growth_of(accounts, TotalAssets)),
        // activity
        (RatioKey::AssetTurnover, current_ratio_of(accounts, Revenue, TotalAssets)),
    ];

    let mut report = RatioReport::default();
    for (key, value) in candidates {
        match value {
            Some(v) if v.is_finite() => report.insert(key, v),
            _ => debug!("{} omitted: input missing or denominator not positive", key),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RatioCategory, RatioUnit};

    fn pair(current: i64, prior: i64) -> Option<AmountPair> {
        Some(AmountPair { current, prior })
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("ratio should be present");
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn full_accounts() -> CanonicalAccounts {
        CanonicalAccounts {
            total_assets: pair(1_000_000, 900_000),
            current_assets: pair(400_000, 380_000),
            total_liabilities: pair(400_000, 380_000),
            current_liabilities: pair(250_000, 240_000),
            total_equity: pair(600_000, 520_000),
            revenue: pair(800_000, 750_000),
            operating_profit: pair(120_000, 100_000),
            net_income: pair(80_000, 70_000),
        }
    }

    #[test]
    fn test_all_ratios_present_for_complete_accounts() {
        let report = compute_ratios(&full_accounts());

        assert_eq!(report.profitability.len(), 4);
        assert_eq!(report.stability.len(), 3);
        assert_eq!(report.growth.len(), 3);
        assert_eq!(report.activity.len(), 1);

        assert_close(report.value(RatioKey::OperatingMargin), 15.0);
        assert_close(report.value(RatioKey::CurrentRatio), 160.0);
        assert_close(report.value(RatioKey::AssetTurnover), 0.8);
        assert_eq!(report.get(RatioKey::AssetTurnover).unwrap().unit, RatioUnit::Times);
    }

    #[test]
    fn test_growth_rate_sign_and_scale() {
        assert_close(growth_rate(AmountPair { current: 1_100, prior: 1_000 }), 10.0);
        assert_close(growth_rate(AmountPair { current: 900, prior: 1_000 }), -10.0);
        assert_eq!(growth_rate(AmountPair { current: 900, prior: 0 }), None);
        assert_eq!(growth_rate(AmountPair { current: 900, prior: -10 }), None);
    }

    #[test]
    fn test_growth_rate_at_i64_limits() {
        let rate = growth_rate(AmountPair { current: i64::MIN, prior: 1 }).unwrap();
        assert!(rate.is_finite() && rate < 0.0);

        let rate = growth_rate(AmountPair { current: i64::MAX, prior: 1 }).unwrap();
        assert!(rate.is_finite() && rate > 0.0);

        let mut accounts = full_accounts();
        accounts.revenue = pair(i64::MIN, 1);
        let report = compute_ratios(&accounts);
        assert!(report.value(RatioKey::RevenueGrowth).unwrap().is_finite());
    }

    #[test]
    fn test_zero_equity_omits_equity_ratios() {
        let mut accounts = full_accounts();
        accounts.total_equity = pair(0, 520_000);

        let report = compute_ratios(&accounts);

        assert!(report.get(RatioKey::Roe).is_none());
        assert!(report.get(RatioKey::DebtRatio).is_none());
        // equity as a numerator is still fine
        assert_close(report.value(RatioKey::EquityRatio), 0.0);
    }

    #[test]
    fn test_negative_denominators_are_omitted() {
        let mut accounts = full_accounts();
        accounts.total_assets = pair(-5, -5);
        accounts.revenue = pair(-1, 100);

        let report = compute_ratios(&accounts);

        for key in [
            RatioKey::Roa,
            RatioKey::EquityRatio,
            RatioKey::AssetTurnover,
            RatioKey::AssetGrowth,
            RatioKey::OperatingMargin,
            RatioKey::NetMargin,
        ] {
            assert!(report.get(key).is_none(), "{} should be omitted", key);
        }
        // revenue growth only looks at prior revenue
        assert!(report.get(RatioKey::RevenueGrowth).is_some());
    }

    #[test]
    fn test_missing_numerator_omits_ratio() {
        let mut accounts = full_accounts();
        accounts.net_income = None;

        let report = compute_ratios(&accounts);

        assert!(report.get(RatioKey::Roe).is_none());
        assert!(report.get(RatioKey::Roa).is_none());
        assert!(report.get(RatioKey::NetMargin).is_none());
        assert!(report.get(RatioKey::IncomeGrowth).is_none());
        assert!(report.get(RatioKey::OperatingMargin).is_some());
    }

    #[test]
    fn test_empty_accounts_give_empty_families() {
        let report = compute_ratios(&CanonicalAccounts::default());
        for category in RatioCategory::ALL {
            assert!(report.family(category).is_empty());
        }
        assert!(report.is_empty());
    }

    #[test]
    fn test_negative_profit_is_kept() {
        let mut accounts = full_accounts();
        accounts.net_income = pair(-60_000, 70_000);

        let report = compute_ratios(&accounts);

        assert_close(report.value(RatioKey::Roe), -10.0);
        assert!(report.value(RatioKey::IncomeGrowth).unwrap() < -100.0);
    }
}
