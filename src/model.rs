use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::model::{CardImportDetail, NeoImportDetail};

/// Catalog-side record of one set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Partial set record for `PUT /sets/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetInfoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl SetInfoUpdate {
    /// Hash bookkeeping plus whatever enrichment was found.
    pub fn with_sha(sha: &str, enrichment: Option<&SetEnrichment>) -> Self {
        Self {
            sha: Some(sha.to_string()),
            set_type: enrichment.and_then(|e| e.product_type.clone()),
            release_date: enrichment.and_then(|e| e.release_date),
            ..Default::default()
        }
    }
}

/// Accepts `null`, `2024-08-02` or a full RFC 3339 timestamp.
fn de_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// One entry of the remote set-file directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub sha: String,
    pub download_url: String,
}

/// One card record inside a set file. Forwarded to the catalog as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetFileEntry {
    pub name: String,
    pub code: String,
    pub rarity: String,
    pub expansion: String,
    pub side: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub color: String,
    pub level: String,
    pub cost: String,
    pub power: String,
    pub soul: i64,
    pub trigger: Vec<String>,
    pub attributes: Vec<String>,
    pub ability: Vec<String>,
    pub flavor_text: String,
    pub set: String,
    pub release: String,
    pub sid: String,
    pub image: String,
}

/// Rarities whose product data is not representative of the set's main product.
pub const EXCLUDED_SAMPLE_RARITIES: [&str; 2] = ["PR", "TD"];

impl SetFileEntry {
    pub fn is_sample_candidate(&self) -> bool {
        !EXCLUDED_SAMPLE_RARITIES.contains(&self.rarity.as_str())
    }
}

/// Release date and product category scraped for a set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetEnrichment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

impl SetEnrichment {
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.product_type.is_none()
    }
}

/// Result of importing one set file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<CardImportDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<SetEnrichment>,
}

impl ImportOutcome {
    pub fn failed(file_name: &str, set_id: Option<&str>, status: u16, message: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            set_id: set_id.map(str::to_string),
            status,
            message,
            details: None,
            enrichment: None,
        }
    }

    /// Anything other than a full success or a not-modified counts against the run.
    pub fn is_error(&self) -> bool {
        !matches!(self.status, 200 | 304)
    }
}

/// Aggregate of all set imports of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    pub message: String,
    pub status: u16,
    /// Changed sets left for a later run because of the batch cap.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub deferred: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ImportOutcome>>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl BatchSummary {
    pub fn fatal(message: String) -> Self {
        Self {
            message,
            status: 500,
            deferred: 0,
            details: None,
        }
    }
}

/// A named grouping of set-code patterns (wildcards such as `F**` kept verbatim).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeoStandard {
    pub title: String,
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeoImportReport {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<NeoImportDetail>>,
}

impl NeoImportReport {
    pub fn fatal(message: String) -> Self {
        Self {
            status: 500,
            message,
            details: None,
        }
    }
}

/// Combined body returned by the HTTP trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportReport {
    #[serde(rename = "neo-import")]
    pub neo_import: NeoImportReport,
    #[serde(rename = "card-import")]
    pub card_import: BatchSummary,
    /// Reserved; foil rarities are not imported yet.
    #[serde(rename = "foil-import")]
    pub foil_import: Option<serde_json::Value>,
}
