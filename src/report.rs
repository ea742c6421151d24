use crate::schema::{LineItem, RatioCategory, RatioReport, StatementType, YearlyRatioTable};
use num_format::{Locale, ToFormattedString};

const JO: f64 = 1_000_000_000_000.0;
const EOK: f64 = 100_000_000.0;
const BAEKMAN: f64 = 1_000_000.0;

/// Maximum ratio lines included in a narration brief.
const NARRATION_RATIO_LIMIT: usize = 6;

/// Formats a won amount with Korean magnitude units (조, 억, 백만).
pub fn format_krw(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs() as f64;

    // a unit is promoted when rounding would print the next unit's threshold
    if magnitude >= JO || (magnitude / EOK).round() >= JO / EOK {
        format!("{}{:.1}조원", sign, magnitude / JO)
    } else if magnitude >= EOK || (magnitude / BAEKMAN).round() >= EOK / BAEKMAN {
        format!("{}{:.0}억원", sign, magnitude / EOK)
    } else if magnitude >= BAEKMAN {
        format!("{}{:.0}백만원", sign, magnitude / BAEKMAN)
    } else {
        format!("{}원", amount.to_formatted_string(&Locale::en))
    }
}

impl RatioReport {
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str("# 재무비율\n\n");

        for category in RatioCategory::ALL {
            output.push_str(&format!(
                "## {} ({})\n\n",
                category.display_name(),
                category
            ));

            let family = self.family(category);
            if family.is_empty() {
                output.push_str("_산출 가능한 지표 없음_\n\n");
                continue;
            }

            output.push_str("| 지표 | 값 |\n|---|---|\n");
            for ratio in family.values() {
                output.push_str(&format!(
                    "| {} | {:.2}{} |\n",
                    ratio.display_name, ratio.value, ratio.unit
                ));
            }
            output.push('\n');
        }

        output
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Category,Ratio,Name,Value,Unit\n");

        for category in RatioCategory::ALL {
            for (key, ratio) in self.family(category) {
                output.push_str(&format!(
                    "{},{},{},{:.2},{}\n",
                    category, key, ratio.display_name, ratio.value, ratio.unit
                ));
            }
        }

        output
    }
}

pub fn yearly_table_to_csv(table: &YearlyRatioTable) -> String {
    let mut output = String::new();
    output.push_str("Year,Category,Ratio,Name,Value,Unit\n");

    for (year, report) in table {
        for category in RatioCategory::ALL {
            for (key, ratio) in report.family(category) {
                output.push_str(&format!(
                    "{},{},{},{},{:.2},{}\n",
                    year, category, key, ratio.display_name, ratio.value, ratio.unit
                ));
            }
        }
    }

    output
}

fn headline_lines(items: &[LineItem], statement: StatementType, keywords: &[&str]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.statement_type == statement)
        .filter(|item| keywords.iter().any(|k| item.account_name.contains(*k)))
        .filter(|item| item.current_amount > 0 || item.prior_amount > 0)
        .map(|item| {
            let change = crate::ratios::growth_rate(item.amounts()).unwrap_or(0.0);
            format!(
                "- {}: {} (전년대비 {:+.1}%)",
                item.account_name,
                format_krw(item.current_amount),
                change
            )
        })
        .collect()
}

/// Plain-text brief of a statement and its ratios for the narration model.
pub fn summarize_for_narration(company_name: &str, items: &[LineItem], report: &RatioReport) -> String {
    let mut parts = vec![format!("**{} 재무제표 분석**\n", company_name)];

    let income = headline_lines(
        items,
        StatementType::IncomeStatement,
        &["매출액", "영업이익", "당기순이익"],
    );
    if !income.is_empty() {
        parts.push("## 손익계산서 주요 항목:".to_string());
        parts.extend(income);
        parts.push(String::new());
    }

    let balance = headline_lines(
        items,
        StatementType::BalanceSheet,
        &["자산총계", "부채총계", "자본총계"],
    );
    if !balance.is_empty() {
        parts.push("## 재무상태표 주요 항목:".to_string());
        parts.extend(balance);
        parts.push(String::new());
    }

    let ratios: Vec<String> = report
        .profitability
        .values()
        .chain(report.stability.values())
        .take(NARRATION_RATIO_LIMIT)
        .map(|ratio| format!("- {}: {:.2}{}", ratio.display_name, ratio.value, ratio.unit))
        .collect();
    if !ratios.is_empty() {
        parts.push("## 주요 재무비율:".to_string());
        parts.extend(ratios);
    }

    parts.join("\n")
}
