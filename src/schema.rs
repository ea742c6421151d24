use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which financial statement a line item was reported on.
///
/// Open DART tags every row with an `sj_div` code. Only `BS` and `IS` take part
/// in classification and canonical extraction; every other code (`CIS`, `CF`,
/// `SCE`, ...) is kept verbatim in [`StatementType::Other`] and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    Other(String),
}

impl StatementType {
    pub fn from_sj_div(code: &str) -> Self {
        match code.trim() {
            "BS" => Self::BalanceSheet,
            "IS" => Self::IncomeStatement,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_sj_div(&self) -> &str {
        match self {
            Self::BalanceSheet => "BS",
            Self::IncomeStatement => "IS",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for StatementType {
    fn from(code: String) -> Self {
        Self::from_sj_div(&code)
    }
}

impl From<StatementType> for String {
    fn from(statement: StatementType) -> Self {
        statement.as_sj_div().to_string()
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sj_div())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineItem {
    #[schemars(description = "Free-text account label as reported (e.g. '매출액', '자산총계'). Not unique, not normalized.")]
    pub account_name: String,

    #[schemars(with = "String")]
    #[schemars(
        description = "Statement code: 'BS' (balance sheet), 'IS' (income statement) or any other sj_div code"
    )]
    pub statement_type: StatementType,

    #[schemars(description = "Amount for the current period in the smallest currency unit. Unparsable source text is 0.")]
    pub current_amount: i64,

    #[schemars(description = "Amount for the prior comparable period in the smallest currency unit.")]
    pub prior_amount: i64,

    #[serde(default)]
    #[schemars(description = "Display label of the current period (e.g. '제 55 기'). Not used in computation.")]
    pub current_period_label: String,

    #[serde(default)]
    #[schemars(description = "Display label of the prior period. Not used in computation.")]
    pub prior_period_label: String,
}

impl LineItem {
    pub fn new(
        account_name: impl Into<String>,
        statement_type: StatementType,
        current_amount: i64,
        prior_amount: i64,
    ) -> Self {
        Self {
            account_name: account_name.into(),
            statement_type,
            current_amount,
            prior_amount,
            current_period_label: String::new(),
            prior_period_label: String::new(),
        }
    }

    #[must_use]
    pub fn with_periods(mut self, current: impl Into<String>, prior: impl Into<String>) -> Self {
        self.current_period_label = current.into();
        self.prior_period_label = prior.into();
        self
    }

    pub fn amounts(&self) -> AmountPair {
        AmountPair {
            current: self.current_amount,
            prior: self.prior_amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AmountPair {
    pub current: i64,
    pub prior: i64,
}

/// The closed set of accounts ratio math is allowed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    TotalAssets,
    CurrentAssets,
    TotalLiabilities,
    CurrentLiabilities,
    TotalEquity,
    Revenue,
    OperatingProfit,
    NetIncome,
}

impl CanonicalKey {
    pub const ALL: [CanonicalKey; 8] = [
        CanonicalKey::TotalAssets,
        CanonicalKey::CurrentAssets,
        CanonicalKey::TotalLiabilities,
        CanonicalKey::CurrentLiabilities,
        CanonicalKey::TotalEquity,
        CanonicalKey::Revenue,
        CanonicalKey::OperatingProfit,
        CanonicalKey::NetIncome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalAssets => "total_assets",
            Self::CurrentAssets => "current_assets",
            Self::TotalLiabilities => "total_liabilities",
            Self::CurrentLiabilities => "current_liabilities",
            Self::TotalEquity => "total_equity",
            Self::Revenue => "revenue",
            Self::OperatingProfit => "operating_profit",
            Self::NetIncome => "net_income",
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical accounts pulled out of a statement.
///
/// `None` means the account was not found, which is different from a reported
/// amount of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CanonicalAccounts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_liabilities: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_profit: Option<AmountPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<AmountPair>,
}

impl CanonicalAccounts {
    pub fn get(&self, key: CanonicalKey) -> Option<AmountPair> {
        match key {
            CanonicalKey::TotalAssets => self.total_assets,
            CanonicalKey::CurrentAssets => self.current_assets,
            CanonicalKey::TotalLiabilities => self.total_liabilities,
            CanonicalKey::CurrentLiabilities => self.current_liabilities,
            CanonicalKey::TotalEquity => self.total_equity,
            CanonicalKey::Revenue => self.revenue,
            CanonicalKey::OperatingProfit => self.operating_profit,
            CanonicalKey::NetIncome => self.net_income,
        }
    }

    fn slot_mut(&mut self, key: CanonicalKey) -> &mut Option<AmountPair> {
        match key {
            CanonicalKey::TotalAssets => &mut self.total_assets,
            CanonicalKey::CurrentAssets => &mut self.current_assets,
            CanonicalKey::TotalLiabilities => &mut self.total_liabilities,
            CanonicalKey::CurrentLiabilities => &mut self.current_liabilities,
            CanonicalKey::TotalEquity => &mut self.total_equity,
            CanonicalKey::Revenue => &mut self.revenue,
            CanonicalKey::OperatingProfit => &mut self.operating_profit,
            CanonicalKey::NetIncome => &mut self.net_income,
        }
    }

    /// Stores `amounts` under `key` unless the key is already populated.
    /// Returns `true` when the value was stored.
    pub fn insert_if_absent(&mut self, key: CanonicalKey, amounts: AmountPair) -> bool {
        let slot = self.slot_mut(key);
        if slot.is_some() {
            return false;
        }
        *slot = Some(amounts);
        true
    }

    pub fn is_empty(&self) -> bool {
        CanonicalKey::ALL.iter().all(|key| self.get(*key).is_none())
    }

    pub fn present_keys(&self) -> Vec<CanonicalKey> {
        CanonicalKey::ALL
            .iter()
            .copied()
            .filter(|key| self.get(*key).is_some())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    Profitability,
    Stability,
    Growth,
    Activity,
}

impl RatioCategory {
    pub const ALL: [RatioCategory; 4] = [
        RatioCategory::Profitability,
        RatioCategory::Stability,
        RatioCategory::Growth,
        RatioCategory::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profitability => "profitability",
            Self::Stability => "stability",
            Self::Growth => "growth",
            Self::Activity => "activity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Profitability => "수익성",
            Self::Stability => "안정성",
            Self::Growth => "성장성",
            Self::Activity => "활동성",
        }
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatioKey {
    Roe,
    Roa,
    OperatingMargin,
    NetMargin,
    DebtRatio,
    EquityRatio,
    CurrentRatio,
    RevenueGrowth,
    IncomeGrowth,
    AssetGrowth,
    AssetTurnover,
}

impl RatioKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roe => "roe",
            Self::Roa => "roa",
            Self::OperatingMargin => "operating_margin",
            Self::NetMargin => "net_margin",
            Self::DebtRatio => "debt_ratio",
            Self::EquityRatio => "equity_ratio",
            Self::CurrentRatio => "current_ratio",
            Self::RevenueGrowth => "revenue_growth",
            Self::IncomeGrowth => "income_growth",
            Self::AssetGrowth => "asset_growth",
            Self::AssetTurnover => "asset_turnover",
        }
    }

    pub fn category(&self) -> RatioCategory {
        match self {
            Self::Roe | Self::Roa | Self::OperatingMargin | Self::NetMargin => {
                RatioCategory::Profitability
            }
            Self::DebtRatio | Self::EquityRatio | Self::CurrentRatio => RatioCategory::Stability,
            Self::RevenueGrowth | Self::IncomeGrowth | Self::AssetGrowth => RatioCategory::Growth,
            Self::AssetTurnover => RatioCategory::Activity,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Roe => "ROE (자기자본이익률)",
            Self::Roa => "ROA (총자산이익률)",
            Self::OperatingMargin => "영업이익률",
            Self::NetMargin => "순이익률",
            Self::DebtRatio => "부채비율",
            Self::EquityRatio => "자기자본비율",
            Self::CurrentRatio => "유동비율",
            Self::RevenueGrowth => "매출액 증가율",
            Self::IncomeGrowth => "순이익 증가율",
            Self::AssetGrowth => "총자산 증가율",
            Self::AssetTurnover => "총자산회전율",
        }
    }

    pub fn unit(&self) -> RatioUnit {
        match self {
            Self::AssetTurnover => RatioUnit::Times,
            _ => RatioUnit::Percent,
        }
    }
}

impl fmt::Display for RatioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RatioUnit {
    #[serde(rename = "%")]
    #[schemars(description = "Percentage points (already multiplied by 100)")]
    Percent,

    #[serde(rename = "회")]
    #[schemars(description = "Times (a plain multiple, not a percentage)")]
    Times,
}

impl RatioUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Times => "회",
        }
    }
}

impl fmt::Display for RatioUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatioValue {
    #[schemars(description = "Ratio value. Percent ratios are already scaled by 100.")]
    pub value: f64,

    #[schemars(description = "Korean display name of the ratio")]
    pub display_name: String,

    pub unit: RatioUnit,
}

impl RatioValue {
    pub fn new(key: RatioKey, value: f64) -> Self {
        Self {
            value,
            display_name: key.display_name().to_string(),
            unit: key.unit(),
        }
    }
}

pub type RatioFamily = BTreeMap<RatioKey, RatioValue>;

/// Ratios grouped by family. A ratio whose inputs were missing or whose
/// denominator was not strictly positive is absent from its family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatioReport {
    pub profitability: RatioFamily,
    pub stability: RatioFamily,
    pub growth: RatioFamily,
    pub activity: RatioFamily,
}

impl RatioReport {
    pub fn family(&self, category: RatioCategory) -> &RatioFamily {
        match category {
            RatioCategory::Profitability => &self.profitability,
            RatioCategory::Stability => &self.stability,
            RatioCategory::Growth => &self.growth,
            RatioCategory::Activity => &self.activity,
        }
    }

    pub fn family_mut(&mut self, category: RatioCategory) -> &mut RatioFamily {
        match category {
            RatioCategory::Profitability => &mut self.profitability,
            RatioCategory::Stability => &mut self.stability,
            RatioCategory::Growth => &mut self.growth,
            RatioCategory::Activity => &mut self.activity,
        }
    }

    /// Files `value` under the family its key belongs to.
    pub fn insert(&mut self, key: RatioKey, value: f64) {
        self.family_mut(key.category())
            .insert(key, RatioValue::new(key, value));
    }

    pub fn get(&self, key: RatioKey) -> Option<&RatioValue> {
        self.family(key.category()).get(&key)
    }

    pub fn value(&self, key: RatioKey) -> Option<f64> {
        self.get(key).map(|ratio| ratio.value)
    }

    pub fn len(&self) -> usize {
        RatioCategory::ALL
            .iter()
            .map(|category| self.family(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RatioReport)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Fiscal year → ratios computed from that year's statement alone.
pub type YearlyRatioTable = BTreeMap<i32, RatioReport>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_type_codes() {
        assert_eq!(StatementType::from_sj_div("BS"), StatementType::BalanceSheet);
        assert_eq!(StatementType::from_sj_div(" IS "), StatementType::IncomeStatement);
        assert_eq!(
            StatementType::from_sj_div("CF"),
            StatementType::Other("CF".to_string())
        );
        assert_eq!(StatementType::Other("CIS".to_string()).as_sj_div(), "CIS");
    }

    #[test]
    fn test_line_item_serializes_sj_div_code() {
        let item = LineItem::new("자산총계", StatementType::BalanceSheet, 100, 90);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"statement_type\":\"BS\""));

        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_insert_if_absent_keeps_first_value() {
        let mut accounts = CanonicalAccounts::default();
        assert!(accounts.is_empty());

        let first = AmountPair { current: 10, prior: 5 };
        let second = AmountPair { current: 99, prior: 99 };
        assert!(accounts.insert_if_absent(CanonicalKey::Revenue, first));
        assert!(!accounts.insert_if_absent(CanonicalKey::Revenue, second));

        assert_eq!(accounts.get(CanonicalKey::Revenue), Some(first));
        assert_eq!(accounts.present_keys(), vec![CanonicalKey::Revenue]);
    }

    #[test]
    fn test_zero_amount_is_not_absent() {
        let mut accounts = CanonicalAccounts::default();
        accounts.insert_if_absent(CanonicalKey::TotalEquity, AmountPair { current: 0, prior: 0 });
        assert!(!accounts.is_empty());
        assert_eq!(
            accounts.get(CanonicalKey::TotalEquity),
            Some(AmountPair { current: 0, prior: 0 })
        );
    }

    #[test]
    fn test_ratio_keys_file_into_their_family() {
        let mut report = RatioReport::default();
        report.insert(RatioKey::AssetTurnover, 0.8);
        report.insert(RatioKey::Roe, 12.5);

        assert_eq!(report.activity.len(), 1);
        assert_eq!(report.profitability.len(), 1);
        assert_eq!(report.get(RatioKey::AssetTurnover).unwrap().unit, RatioUnit::Times);
        assert_eq!(report.get(RatioKey::Roe).unwrap().display_name, "ROE (자기자본이익률)");
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = RatioReport::default();
        report.insert(RatioKey::DebtRatio, 66.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stability"]["debt_ratio"]["unit"], "%");
        assert_eq!(json["stability"]["debt_ratio"]["display_name"], "부채비율");
        assert!(json["growth"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = RatioReport::schema_as_json().unwrap();
        assert!(schema_json.contains("profitability"));
        assert!(schema_json.contains("activity"));
        assert!(schema_json.contains("display_name"));
    }
}
