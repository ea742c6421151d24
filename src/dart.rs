use crate::error::{FinancialRatioError, Result};
use crate::ingestion::{DartResponse, ReportCode};
use crate::schema::LineItem;
use futures::future::join_all;
use log::{info, warn};
use reqwest::Client;
use std::collections::BTreeMap;

const DART_BASE_URL: &str = "https://opendart.fss.or.kr/api";
const SINGLE_ACCOUNT_ENDPOINT: &str = "fnlttSinglAcnt.json";

/// Client for the Open DART single-company key-account endpoint.
#[derive(Clone)]
pub struct DartClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DartClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DART_BASE_URL.to_string(),
        }
    }

    /// Reads `DART_API_KEY`, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let api_key = std::env::var("DART_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(FinancialRatioError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}/{}", self.base_url, SINGLE_ACCOUNT_ENDPOINT)
    }

    fn query<'a>(&'a self, corp_code: &'a str, year: &'a str, report: ReportCode) -> [(&'static str, &'a str); 4] {
        [
            ("crtfc_key", self.api_key.as_str()),
            ("corp_code", corp_code),
            ("bsns_year", year),
            ("reprt_code", report.code()),
        ]
    }

    /// Fetches one statement. A non-"000" status is returned as an error.
    pub async fn fetch_statement(
        &self,
        corp_code: &str,
        year: i32,
        report: ReportCode,
    ) -> Result<DartResponse> {
        let year = year.to_string();
        info!(
            "Fetching {} for {} FY{} ({})",
            SINGLE_ACCOUNT_ENDPOINT,
            corp_code,
            year,
            report.display_name()
        );

        let response = self
            .client
            .get(self.endpoint_url())
            .query(&self.query(corp_code, &year, report))
            .send()
            .await?
            .error_for_status()?;

        let body: DartResponse = response.json().await?;
        body.ensure_ok()?;

        info!("Received {} rows for {} FY{}", body.list.len(), corp_code, year);
        Ok(body)
    }

    /// Like [`fetch_statement`](Self::fetch_statement), but any failure yields
    /// an empty item list.
    pub async fn fetch_items(&self, corp_code: &str, year: i32, report: ReportCode) -> Vec<LineItem> {
        match self.fetch_statement(corp_code, year, report).await {
            Ok(response) => response.line_items(),
            Err(e) => {
                warn!("Fetch failed for {} FY{}, using empty statement: {}", corp_code, year, e);
                Vec::new()
            }
        }
    }

    /// Fetches every year in `start..=end` concurrently. Years that fail are
    /// present with an empty list.
    pub async fn fetch_multi_year(
        &self,
        corp_code: &str,
        start: i32,
        end: i32,
        report: ReportCode,
    ) -> BTreeMap<i32, Vec<LineItem>> {
        let years: Vec<i32> = (start..=end).collect();
        let fetches = years
            .iter()
            .map(|year| self.fetch_items(corp_code, *year, report));
        let results = join_all(fetches).await;

        years.into_iter().zip(results).collect()
    }
}
