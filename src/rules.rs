//! Account-name matching tables.
//!
//! Classification and canonical extraction are both driven by ordered keyword
//! tables rather than hand-written conditionals, so a custom table can be
//! loaded from JSON and unit-tested on its own. [`AccountRules::default`] holds
//! the tables for Korean Open DART statements.

use crate::error::{FinancialRatioError, Result};
use crate::schema::{CanonicalKey, StatementType};
use serde::{Deserialize, Serialize};

/// Display-oriented bucket of a [`crate::ClassifiedStatement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Profit,
    Expenses,
}

impl Bucket {
    pub fn statement_type(&self) -> StatementType {
        match self {
            Self::Assets | Self::Liabilities | Self::Equity => StatementType::BalanceSheet,
            Self::Revenue | Self::Profit | Self::Expenses => StatementType::IncomeStatement,
        }
    }
}

/// Routes an item into `bucket` when its name contains any of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRule {
    pub bucket: Bucket,
    pub keywords: Vec<String>,
}

impl BucketRule {
    pub fn new(bucket: Bucket, keywords: &[&str]) -> Self {
        Self {
            bucket,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, account_name: &str) -> bool {
        self.keywords.iter().any(|k| account_name.contains(k.as_str()))
    }
}

/// Populates `key` from an item on `statement` whose name contains `keyword`
/// and none of `exclusions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRule {
    pub key: CanonicalKey,
    pub statement: StatementType,
    pub keyword: String,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl CanonicalRule {
    pub fn new(
        key: CanonicalKey,
        statement: StatementType,
        keyword: &str,
        exclusions: &[&str],
    ) -> Self {
        Self {
            key,
            statement,
            keyword: keyword.to_string(),
            exclusions: exclusions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn matches(&self, statement: &StatementType, account_name: &str) -> bool {
        *statement == self.statement
            && account_name.contains(self.keyword.as_str())
            && !self
                .exclusions
                .iter()
                .any(|e| account_name.contains(e.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRules {
    /// Evaluated in order for `BS` items; first matching rule wins.
    pub balance_sheet: Vec<BucketRule>,
    /// Evaluated in order for `IS` items; first matching rule wins.
    pub income_statement: Vec<BucketRule>,
    /// Evaluated independently per rule; an item may fill several keys.
    pub canonical: Vec<CanonicalRule>,
}

impl Default for AccountRules {
    fn default() -> Self {
        Self::open_dart()
    }
}

impl AccountRules {
    pub fn open_dart() -> Self {
        use CanonicalKey::*;
        let bs = StatementType::BalanceSheet;
        let is = StatementType::IncomeStatement;

        Self {
            balance_sheet: vec![
                BucketRule::new(Bucket::Assets, &["자산"]),
                BucketRule::new(Bucket::Liabilities, &["부채", "차입"]),
                BucketRule::new(Bucket::Equity, &["자본", "이익잉여금"]),
            ],
            income_statement: vec![
                BucketRule::new(Bucket::Revenue, &["매출"]),
                BucketRule::new(Bucket::Profit, &["이익", "손익"]),
                BucketRule::new(Bucket::Expenses, &["비용", "원가"]),
            ],
            canonical: vec![
                CanonicalRule::new(TotalAssets, bs.clone(), "자산총계", &[]),
                CanonicalRule::new(CurrentAssets, bs.clone(), "유동자산", &[]),
                CanonicalRule::new(TotalLiabilities, bs.clone(), "부채총계", &[]),
                CanonicalRule::new(CurrentLiabilities, bs.clone(), "유동부채", &[]),
                CanonicalRule::new(TotalEquity, bs, "자본총계", &[]),
                CanonicalRule::new(Revenue, is.clone(), "매출액", &["매출원가"]),
                CanonicalRule::new(OperatingProfit, is.clone(), "영업이익", &[]),
                CanonicalRule::new(NetIncome, is, "당기순이익", &["손실"]),
            ],
        }
    }

    pub fn bucket_rules(&self, statement: &StatementType) -> &[BucketRule] {
        match statement {
            StatementType::BalanceSheet => &self.balance_sheet,
            StatementType::IncomeStatement => &self.income_statement,
            StatementType::Other(_) => &[],
        }
    }

    /// First bucket whose rule matches, in table order.
    pub fn bucket_for(&self, statement: &StatementType, account_name: &str) -> Option<Bucket> {
        self.bucket_rules(statement)
            .iter()
            .find(|rule| rule.matches(account_name))
            .map(|rule| rule.bucket)
    }

    pub fn validate(&self) -> Result<()> {
        for (section, rules, expected) in [
            ("balance_sheet", &self.balance_sheet, StatementType::BalanceSheet),
            ("income_statement", &self.income_statement, StatementType::IncomeStatement),
        ] {
            for (idx, rule) in rules.iter().enumerate() {
                if rule.keywords.is_empty() {
                    return Err(FinancialRatioError::InvalidRules(format!(
                        "{} rule #{} ({:?}) has no keywords",
                        section, idx, rule.bucket
                    )));
                }
                if rule.keywords.iter().any(|k| k.is_empty()) {
                    return Err(FinancialRatioError::InvalidRules(format!(
                        "{} rule #{} ({:?}) contains an empty keyword",
                        section, idx, rule.bucket
                    )));
                }
                if rule.bucket.statement_type() != expected {
                    return Err(FinancialRatioError::InvalidRules(format!(
                        "{} rule #{} routes to {:?}, which belongs to the {} statement",
                        section,
                        idx,
                        rule.bucket,
                        rule.bucket.statement_type()
                    )));
                }
            }
        }

        for (idx, rule) in self.canonical.iter().enumerate() {
            if rule.keyword.is_empty() {
                return Err(FinancialRatioError::InvalidRules(format!(
                    "canonical rule #{} ({}) has an empty keyword",
                    idx, rule.key
                )));
            }
            if rule.exclusions.iter().any(|e| e.is_empty()) {
                return Err(FinancialRatioError::InvalidRules(format!(
                    "canonical rule #{} ({}) contains an empty exclusion",
                    idx, rule.key
                )));
            }
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
