use serde::{Deserialize, Serialize};

/// Reply to create/update set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetResponse {
    pub set_id: String,
    pub status: u16,
    pub message: String,
}

/// One card the catalog rejected or accepted during a bulk import.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardImportDetail {
    pub card_code: String,
    pub card_name: String,
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardImportResponse {
    pub set_id: String,
    pub message: String,
    pub status: u16,
    pub error_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<CardImportDetail>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NeoImportDetail {
    pub title: String,
    pub codes: Vec<String>,
    pub status: u16,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NeoImportResponse {
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<NeoImportDetail>>,
}

/// Body the catalog sends alongside a non-2xx status.
#[derive(Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
}
