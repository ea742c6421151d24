use crate::rules::{AccountRules, Bucket};
use crate::schema::LineItem;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type AccountBucket = BTreeMap<String, LineItem>;

/// Display-oriented view of a statement, one map per bucket keyed by account
/// name. A later item with the same name replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedStatement {
    pub assets: AccountBucket,
    pub liabilities: AccountBucket,
    pub equity: AccountBucket,
    pub revenue: AccountBucket,
    pub profit: AccountBucket,
    pub expenses: AccountBucket,
}

impl ClassifiedStatement {
    pub fn classify(items: &[LineItem], rules: &AccountRules) -> Self {
        let mut classified = Self::default();
        let mut dropped = 0usize;

        for item in items {
            match rules.bucket_for(&item.statement_type, &item.account_name) {
                Some(bucket) => {
                    classified
                        .bucket_mut(bucket)
                        .insert(item.account_name.clone(), item.clone());
                }
                None => dropped += 1,
            }
        }

        debug!(
            "Classified {} items into {} bucket entries ({} unmatched)",
            items.len(),
            classified.total_accounts(),
            dropped
        );

        classified
    }

    pub fn bucket(&self, bucket: Bucket) -> &AccountBucket {
        match bucket {
            Bucket::Assets => &self.assets,
            Bucket::Liabilities => &self.liabilities,
            Bucket::Equity => &self.equity,
            Bucket::Revenue => &self.revenue,
            Bucket::Profit => &self.profit,
            Bucket::Expenses => &self.expenses,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut AccountBucket {
        match bucket {
            Bucket::Assets => &mut self.assets,
            Bucket::Liabilities => &mut self.liabilities,
            Bucket::Equity => &mut self.equity,
            Bucket::Revenue => &mut self.revenue,
            Bucket::Profit => &mut self.profit,
            Bucket::Expenses => &mut self.expenses,
        }
    }

    pub fn total_accounts(&self) -> usize {
        self.assets.len()
            + self.liabilities.len()
            + self.equity.len()
            + self.revenue.len()
            + self.profit.len()
            + self.expenses.len()
    }

    fn sections(&self) -> [(&'static str, &AccountBucket); 6] {
        [
            ("Assets", &self.assets),
            ("Liabilities", &self.liabilities),
            ("Equity", &self.equity),
            ("Revenue", &self.revenue),
            ("Profit", &self.profit),
            ("Expenses", &self.expenses),
        ]
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Section,Account Name,Current Amount,Prior Amount\n");

        for (section, bucket) in self.sections() {
            for item in bucket.values() {
                output.push_str(&format!(
                    "{},{},{},{}\n",
                    section, item.account_name, item.current_amount, item.prior_amount
                ));
            }
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("## 재무상태표\n\n");
        for (section, bucket) in &self.sections()[..3] {
            write_markdown_section(&mut output, section, bucket);
        }

        output.push_str("## 손익계산서\n\n");
        for (section, bucket) in &self.sections()[3..] {
            write_markdown_section(&mut output, section, bucket);
        }

        output
    }
}

fn write_markdown_section(output: &mut String, section: &str, bucket: &AccountBucket) {
    output.push_str(&format!("### {}\n\n", section));
    for item in bucket.values() {
        output.push_str(&format!(
            "- {}: {} (전기 {})\n",
            item.account_name,
            crate::report::format_krw(item.current_amount),
            crate::report::format_krw(item.prior_amount)
        ));
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StatementType;

    fn bs(name: &str, current: i64) -> LineItem {
        LineItem::new(name, StatementType::BalanceSheet, current, 0)
    }

    fn is(name: &str, current: i64) -> LineItem {
        LineItem::new(name, StatementType::IncomeStatement, current, 0)
    }

    #[test]
    fn test_balance_sheet_routing() {
        let items = vec![
            bs("유동자산", 10),
            bs("자산총계", 30),
            bs("부채총계", 12),
            bs("단기차입금", 4),
            bs("자본총계", 18),
            bs("이익잉여금", 6),
            bs("기타포괄손익누계액", 1),
        ];

        let classified = ClassifiedStatement::classify(&items, &AccountRules::default());

        assert_eq!(classified.assets.len(), 2);
        assert_eq!(classified.liabilities.len(), 2);
        assert_eq!(classified.equity.len(), 2);
        assert!(!classified.assets.contains_key("기타포괄손익누계액"));
        assert_eq!(classified.total_accounts(), 6);
    }

    #[test]
    fn test_income_statement_routing() {
        let items = vec![
            is("매출액", 100),
            is("매출원가", 60),
            is("영업이익", 20),
            is("법인세차감전 순손익", 18),
            is("판매비와관리비", 20),
            is("금융비용", 2),
            is("기타", 1),
        ];

        let classified = ClassifiedStatement::classify(&items, &AccountRules::default());

        // "매출" takes priority, so cost of sales lands in revenue
        assert!(classified.revenue.contains_key("매출원가"));
        assert_eq!(classified.revenue.len(), 2);
        assert_eq!(classified.profit.len(), 2);
        assert_eq!(classified.expenses.len(), 1);
        assert!(classified.expenses.contains_key("금융비용"));
        assert_eq!(classified.total_accounts(), 5);
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let items = vec![bs("자산총계", 1), bs("자산총계", 2), bs("자산총계", 3)];

        let classified = ClassifiedStatement::classify(&items, &AccountRules::default());

        assert_eq!(classified.assets.len(), 1);
        assert_eq!(classified.assets["자산총계"].current_amount, 3);
    }

    #[test]
    fn test_other_statement_types_are_dropped() {
        let items = vec![LineItem::new(
            "자산총계",
            StatementType::Other("CF".to_string()),
            1,
            1,
        )];

        let classified = ClassifiedStatement::classify(&items, &AccountRules::default());
        assert_eq!(classified.total_accounts(), 0);
    }

    #[test]
    fn test_classified_to_csv() {
        let classified =
            ClassifiedStatement::classify(&[bs("자산총계", 30), is("매출액", 100)], &AccountRules::default());
        let csv = classified.to_csv();

        assert!(csv.starts_with("Section,Account Name"));
        assert!(csv.contains("Assets,자산총계,30,0"));
        assert!(csv.contains("Revenue,매출액,100,0"));
    }

    #[test]
    fn test_classified_to_markdown() {
        let classified = ClassifiedStatement::classify(&[bs("자산총계", 1_500)], &AccountRules::default());
        let markdown = classified.to_markdown();

        assert!(markdown.contains("## 재무상태표"));
        assert!(markdown.contains("### Assets"));
        assert!(markdown.contains("- 자산총계: 1,500원"));
    }
}
