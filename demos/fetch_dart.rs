use financial_ratio_builder::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let corp_code = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "00126380".to_string());

    let client = DartClient::from_env()?;

    println!("🔍 Fetching FY2021-FY2023 for {}...", corp_code);
    let by_year = client
        .fetch_multi_year(&corp_code, 2021, 2023, ReportCode::Annual)
        .await;

    for (year, items) in &by_year {
        println!("  FY{}: {} line items", year, items.len());
    }

    let table = compute_multi_year(&by_year);
    for (year, report) in &table {
        println!("\n=== FY{} ===", year);
        print!("{}", report.to_markdown());
    }

    Ok(())
}
