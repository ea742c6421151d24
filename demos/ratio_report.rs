use financial_ratio_builder::*;
use std::collections::BTreeMap;

fn statement(
    assets: (i64, i64),
    liabilities: (i64, i64),
    equity: (i64, i64),
    revenue: (i64, i64),
    operating_profit: (i64, i64),
    net_income: (i64, i64),
) -> Vec<LineItem> {
    vec![
        LineItem::new("자산총계", StatementType::BalanceSheet, assets.0, assets.1),
        LineItem::new("부채총계", StatementType::BalanceSheet, liabilities.0, liabilities.1),
        LineItem::new("자본총계", StatementType::BalanceSheet, equity.0, equity.1),
        LineItem::new("매출액", StatementType::IncomeStatement, revenue.0, revenue.1),
        LineItem::new("매출원가", StatementType::IncomeStatement, revenue.0 * 6 / 10, revenue.1 * 6 / 10),
        LineItem::new("영업이익", StatementType::IncomeStatement, operating_profit.0, operating_profit.1),
        LineItem::new("당기순이익", StatementType::IncomeStatement, net_income.0, net_income.1),
    ]
}

fn main() {
    println!("📊 Ratio Report Demo\n");

    let mut by_year = BTreeMap::new();
    by_year.insert(
        2021,
        statement(
            (900_000_000_000, 820_000_000_000),
            (380_000_000_000, 360_000_000_000),
            (520_000_000_000, 460_000_000_000),
            (750_000_000_000, 700_000_000_000),
            (90_000_000_000, 80_000_000_000),
            (70_000_000_000, 60_000_000_000),
        ),
    );
    by_year.insert(
        2022,
        statement(
            (1_000_000_000_000, 900_000_000_000),
            (400_000_000_000, 380_000_000_000),
            (600_000_000_000, 520_000_000_000),
            (800_000_000_000, 750_000_000_000),
            (100_000_000_000, 90_000_000_000),
            (80_000_000_000, 70_000_000_000),
        ),
    );
    // No filing found for this year
    by_year.insert(2023, Vec::new());

    let pipeline = RatioPipeline::default();

    let latest = &by_year[&2022];
    let report = pipeline.analyze(latest);
    println!("{}", report.to_markdown());

    println!("🗂️  Classified accounts (FY2022):\n");
    println!("{}", pipeline.classify(latest).to_markdown());

    let table = pipeline.analyze_multi_year(&by_year);
    println!("📈 ROE trend:");
    let roe = ratio_trend(&table, RatioCategory::Profitability, RatioKey::Roe);
    for (year, value) in roe.years.iter().zip(&roe.values) {
        println!("  FY{}: {:.2}%", year, value);
    }

    println!("\n💰 Revenue trend:");
    let revenue = pipeline.account_trend(&by_year, CanonicalKey::Revenue);
    for (year, value) in revenue.years.iter().zip(&revenue.values) {
        match value {
            Some(amount) => println!("  FY{}: {}", year, format_krw(*amount)),
            None => println!("  FY{}: (no data)", year),
        }
    }

    println!("\n📝 Narration brief:\n");
    println!("{}", summarize_for_narration("데모전자", latest, &report));

    println!("\n📄 CSV export:\n");
    print!("{}", yearly_table_to_csv(&table));
}
