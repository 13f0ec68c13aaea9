use serde::{Deserialize, Serialize};

use crate::domain::{AudioFile, FileId};

pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

pub const LIST_PAGE_SIZE: u32 = 100;
pub const LIST_ORDER_BY: &str = "name";
pub const LIST_FIELDS: &str = "nextPageToken, files(id, name)";

/// Two-column name/rating table covering both whole columns.
pub const RATING_RANGE: &str = "A:B";
pub const VALUE_INPUT_OPTION: &str = "RAW";

pub const OAUTH_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/spreadsheets",
];

const STREAM_URL_PREFIX: &str = "https://drive.google.com/uc?id=";

pub fn stream_url(file_id: &FileId) -> String {
    format!("{STREAM_URL_PREFIX}{}", file_id.as_str())
}

/// Drive query for the direct children of `folder_id`. Backslashes are
/// escaped before quotes so the literal cannot be closed early.
pub fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}' in parents")
}

/// Body of a Drive `files.list` response restricted to `LIST_FIELDS`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<AudioFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Sheets `ValueRange`. Reads omit `values` entirely when the range is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Vec<String>>>,
}

impl ValueRange {
    pub fn rows(range: &str, values: Vec<Vec<String>>) -> Self {
        Self {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values: Some(values),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_cells: Option<u64>,
}

/// Google's JSON error envelope, `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorEnvelope {
    pub error: GoogleErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
