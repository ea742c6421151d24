use crate::rules::AccountRules;
use crate::schema::{CanonicalAccounts, LineItem};
use log::debug;

/// Picks the canonical accounts out of a raw, unclassified item list.
///
/// Each rule is checked independently against every item, so one item can fill
/// several keys. For a given key the first matching item in input order is
/// authoritative; later matches are ignored.
pub fn extract_canonical_with(items: &[LineItem], rules: &AccountRules) -> CanonicalAccounts {
    let mut accounts = CanonicalAccounts::default();

    for item in items {
        for rule in &rules.canonical {
            if !rule.matches(&item.statement_type, &item.account_name) {
                continue;
            }

            if accounts.insert_if_absent(rule.key, item.amounts()) {
                debug!(
                    "{} <- '{}' (current {}, prior {})",
                    rule.key, item.account_name, item.current_amount, item.prior_amount
                );
            } else {
                debug!(
                    "{} already set, ignoring later match '{}'",
                    rule.key, item.account_name
                );
            }
        }
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AmountPair, CanonicalKey, StatementType};

    fn bs(name: &str, current: i64, prior: i64) -> LineItem {
        LineItem::new(name, StatementType::BalanceSheet, current, prior)
    }

    fn is(name: &str, current: i64, prior: i64) -> LineItem {
        LineItem::new(name, StatementType::IncomeStatement, current, prior)
    }

    fn extract(items: &[LineItem]) -> CanonicalAccounts {
        extract_canonical_with(items, &AccountRules::default())
    }

    #[test]
    fn test_extracts_every_canonical_key() {
        let items = vec![
            bs("유동자산", 400, 350),
            bs("자산총계", 1_000, 900),
            bs("유동부채", 200, 210),
            bs("부채총계", 400, 380),
            bs("자본총계", 600, 520),
            is("매출액", 800, 750),
            is("영업이익", 100, 90),
            is("당기순이익", 80, 70),
        ];

        let accounts = extract(&items);

        assert_eq!(accounts.present_keys().len(), 8);
        assert_eq!(
            accounts.get(CanonicalKey::CurrentAssets),
            Some(AmountPair { current: 400, prior: 350 })
        );
        assert_eq!(
            accounts.get(CanonicalKey::OperatingProfit),
            Some(AmountPair { current: 100, prior: 90 })
        );
    }

    #[test]
    fn test_first_match_wins() {
        let items = vec![
            bs("자산총계", 1_000, 900),
            bs("자산총계", 2_000, 1_900),
            bs("자산총계(별도)", 3_000, 2_900),
        ];

        let accounts = extract(&items);

        assert_eq!(
            accounts.total_assets,
            Some(AmountPair { current: 1_000, prior: 900 })
        );
    }

    #[test]
    fn test_revenue_excludes_cost_of_sales() {
        let accounts = extract(&[is("매출원가", 500, 400)]);
        assert_eq!(accounts.revenue, None);

        let accounts = extract(&[is("매출원가", 500, 400), is("매출액", 800, 750)]);
        assert_eq!(accounts.revenue, Some(AmountPair { current: 800, prior: 750 }));
    }

    #[test]
    fn test_net_income_excludes_loss_labels() {
        let accounts = extract(&[is("당기순손실", -50, 10)]);
        assert_eq!(accounts.net_income, None);

        // Any "손실" in the label excludes it, even a compound profit label
        let accounts = extract(&[is("당기순이익(손실)", 30, 20)]);
        assert_eq!(accounts.net_income, None);
    }

    #[test]
    fn test_statement_type_must_match() {
        let items = vec![
            is("자산총계", 1_000, 900),
            bs("매출액", 800, 750),
            LineItem::new("영업이익", StatementType::Other("CIS".into()), 1, 1),
        ];

        assert!(extract(&items).is_empty());
    }

    #[test]
    fn test_one_item_can_fill_several_keys() {
        let mut rules = AccountRules::default();
        rules.canonical.push(crate::rules::CanonicalRule::new(
            CanonicalKey::TotalEquity,
            StatementType::BalanceSheet,
            "자산총계",
            &[],
        ));

        let accounts = extract_canonical_with(&[bs("자산총계", 10, 9)], &rules);

        assert_eq!(accounts.total_assets, Some(AmountPair { current: 10, prior: 9 }));
        assert_eq!(accounts.total_equity, Some(AmountPair { current: 10, prior: 9 }));
    }

    #[test]
    fn test_non_current_assets_after_current_assets_is_ignored() {
        let items = vec![bs("유동자산", 400, 350), bs("비유동자산", 600, 550)];
        let accounts = extract(&items);
        assert_eq!(
            accounts.current_assets,
            Some(AmountPair { current: 400, prior: 350 })
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let items = vec![
            bs("자산총계", 1_000, 900),
            is("매출액", 800, 750),
            is("당기순이익", 80, 70),
        ];
        assert_eq!(extract(&items), extract(&items));
    }

    #[test]
    fn test_empty_input_gives_empty_accounts() {
        assert!(extract(&[]).is_empty());
    }
}
