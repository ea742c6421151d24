use crate::classifier::ClassifiedStatement;
use crate::error::{FinancialRatioError, Result};
use crate::rules::AccountRules;
use crate::schema::{LineItem, StatementType};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Status code Open DART uses for a successful lookup.
pub const DART_STATUS_OK: &str = "000";

/// Report type requested from Open DART (`reprt_code`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportCode {
    #[default]
    #[serde(rename = "11011")]
    Annual,
    #[serde(rename = "11012")]
    HalfYear,
    #[serde(rename = "11013")]
    FirstQuarter,
    #[serde(rename = "11014")]
    ThirdQuarter,
}

impl ReportCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Annual => "11011",
            Self::HalfYear => "11012",
            Self::FirstQuarter => "11013",
            Self::ThirdQuarter => "11014",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "11011" => Some(Self::Annual),
            "11012" => Some(Self::HalfYear),
            "11013" => Some(Self::FirstQuarter),
            "11014" => Some(Self::ThirdQuarter),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Annual => "사업보고서",
            Self::HalfYear => "반기보고서",
            Self::FirstQuarter => "1분기보고서",
            Self::ThirdQuarter => "3분기보고서",
        }
    }
}

/// Korean report name for a raw `reprt_code`, including unknown codes.
pub fn report_name(code: &str) -> &'static str {
    ReportCode::from_code(code)
        .map(|report| report.display_name())
        .unwrap_or("알 수 없는 보고서")
}

/// Consolidated vs. separate statements (`fs_div`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FsDiv {
    #[serde(rename = "CFS")]
    Consolidated,
    #[serde(rename = "OFS")]
    Separate,
}

impl FsDiv {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Consolidated => "CFS",
            Self::Separate => "OFS",
        }
    }
}

/// One row of the `fnlttSinglAcnt` response. Amounts are comma-formatted text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DartAccountRow {
    #[serde(rename = "account_nm", default)]
    pub account_name: String,
    #[serde(default)]
    pub sj_div: String,
    #[serde(default)]
    pub sj_nm: String,
    #[serde(default)]
    pub fs_div: String,
    #[serde(default)]
    pub fs_nm: String,
    #[serde(rename = "thstrm_nm", default)]
    pub current_period_name: String,
    #[serde(rename = "thstrm_dt", default)]
    pub current_period_date: String,
    #[serde(rename = "thstrm_amount", default)]
    pub current_amount: String,
    #[serde(rename = "frmtrm_nm", default)]
    pub prior_period_name: String,
    #[serde(rename = "frmtrm_dt", default)]
    pub prior_period_date: String,
    #[serde(rename = "frmtrm_amount", default)]
    pub prior_amount: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub ord: Option<String>,
}

impl DartAccountRow {
    pub fn to_line_item(&self) -> LineItem {
        LineItem::new(
            self.account_name.clone(),
            StatementType::from_sj_div(&self.sj_div),
            parse_amount(&self.current_amount),
            parse_amount(&self.prior_amount),
        )
        .with_periods(
            self.current_period_name.clone(),
            self.prior_period_name.clone(),
        )
    }

    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or("KRW")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DartResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub list: Vec<DartAccountRow>,
}

impl DartResponse {
    /// Strict parse: malformed JSON or a non-success status is an error.
    pub fn from_json(json: &str) -> Result<Self> {
        let response: Self = serde_json::from_str(json)?;
        response.ensure_ok()?;
        Ok(response)
    }

    pub fn is_ok(&self) -> bool {
        self.status == DART_STATUS_OK
    }

    pub fn ensure_ok(&self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(FinancialRatioError::ApiStatus {
                status: self.status.clone(),
                message: self.message.clone(),
            })
        }
    }

    pub fn rows_for_division(&self, division: FsDiv) -> Vec<&DartAccountRow> {
        self.list
            .iter()
            .filter(|row| row.fs_div == division.code())
            .collect()
    }

    /// Line items in response order.
    pub fn line_items(&self) -> Vec<LineItem> {
        self.list.iter().map(DartAccountRow::to_line_item).collect()
    }

    pub fn line_items_for_division(&self, division: FsDiv) -> Vec<LineItem> {
        self.rows_for_division(division)
            .into_iter()
            .map(DartAccountRow::to_line_item)
            .collect()
    }
}

/// Strips thousands separators and parses; anything unparsable is 0.
pub fn parse_amount(text: &str) -> i64 {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<i64>().unwrap_or(0)
}

/// Lenient parse of a raw response body into line items.
///
/// A body that is not valid JSON, or that carries a non-success status, is
/// treated as an empty statement.
pub fn parse_response_json(json: &str) -> Vec<LineItem> {
    let response: DartResponse = match serde_json::from_str(json) {
        Ok(response) => response,
        Err(e) => {
            warn!("Unparsable Open DART response, treating as empty: {}", e);
            return Vec::new();
        }
    };

    if !response.is_ok() {
        warn!(
            "Open DART status {} ({}), treating as empty",
            response.status, response.message
        );
        return Vec::new();
    }

    let items = response.line_items();
    debug!("Parsed {} line items from response", items.len());
    items
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub status: String,
    pub message: String,
    pub parsed_at: DateTime<Utc>,
}

/// A response digested for display: metadata, the bucketed view and the raw
/// item list that canonical extraction reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub metadata: StatementMetadata,
    pub classified: ClassifiedStatement,
    pub items: Vec<LineItem>,
}

impl ParsedStatement {
    pub fn from_response(response: &DartResponse, rules: &AccountRules) -> Self {
        let items = response.line_items();
        Self {
            metadata: StatementMetadata {
                status: response.status.clone(),
                message: response.message.clone(),
                parsed_at: Utc::now(),
            },
            classified: ClassifiedStatement::classify(&items, rules),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
