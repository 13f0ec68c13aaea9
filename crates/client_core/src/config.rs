use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::{FolderId, SheetId},
    protocol::{DRIVE_API_BASE, SHEETS_API_BASE},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::http::{check_status, GoogleCredentials};

pub const DEFAULT_CONFIG_LOCATION: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to fetch config from {location}: {source}")]
    Fetch {
        location: String,
        source: anyhow::Error,
    },
    #[error("config at {location} is not a valid JSON document: {source}")]
    Parse {
        location: String,
        source: serde_json::Error,
    },
    #[error("config field '{0}' is required")]
    MissingField(&'static str),
}

/// The configuration document as written, before overrides and validation.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    pub sheet_id: Option<String>,
    pub client_id: Option<String>,
    pub api_key: Option<String>,
    pub drive_folder_id: Option<String>,
    pub access_token: Option<String>,
    pub drive_api_base: Option<String>,
    pub sheets_api_base: Option<String>,
}

impl ConfigDocument {
    /// Applies `RATER__*` overrides. Blank variables are ignored, so an empty
    /// export never shadows a document value. `GOOGLE_ACCESS_TOKEN` only fills
    /// a missing token.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| non_empty(lookup(key));
        let fields: [(&str, &mut Option<String>); 7] = [
            ("RATER__SHEET_ID", &mut self.sheet_id),
            ("RATER__CLIENT_ID", &mut self.client_id),
            ("RATER__API_KEY", &mut self.api_key),
            ("RATER__DRIVE_FOLDER_ID", &mut self.drive_folder_id),
            ("RATER__ACCESS_TOKEN", &mut self.access_token),
            ("RATER__DRIVE_API_BASE", &mut self.drive_api_base),
            ("RATER__SHEETS_API_BASE", &mut self.sheets_api_base),
        ];
        for (key, slot) in fields {
            if let Some(value) = lookup(key) {
                *slot = Some(value);
            }
        }

        if non_empty(self.access_token.clone()).is_none() {
            if let Some(value) = lookup("GOOGLE_ACCESS_TOKEN") {
                self.access_token = Some(value);
            }
        }
    }

    pub fn validate(self) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            sheet_id: SheetId(non_empty(self.sheet_id).ok_or(ConfigError::MissingField("sheetId"))?),
            client_id: non_empty(self.client_id).ok_or(ConfigError::MissingField("clientId"))?,
            api_key: non_empty(self.api_key).ok_or(ConfigError::MissingField("apiKey"))?,
            drive_folder_id: non_empty(self.drive_folder_id).map(FolderId),
            access_token: non_empty(self.access_token),
            drive_api_base: non_empty(self.drive_api_base)
                .unwrap_or_else(|| DRIVE_API_BASE.to_string()),
            sheets_api_base: non_empty(self.sheets_api_base)
                .unwrap_or_else(|| SHEETS_API_BASE.to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub sheet_id: SheetId,
    pub client_id: String,
    pub api_key: String,
    pub drive_folder_id: Option<FolderId>,
    pub access_token: Option<String>,
    pub drive_api_base: String,
    pub sheets_api_base: String,
}

impl AppConfig {
    pub fn credentials(&self) -> GoogleCredentials {
        GoogleCredentials::new(self.api_key.clone(), self.access_token.clone())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("sheet_id", &self.sheet_id)
            .field("client_id", &self.client_id)
            .field("api_key", &"<redacted>")
            .field("drive_folder_id", &self.drive_folder_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("drive_api_base", &self.drive_api_base)
            .field("sheets_api_base", &self.sheets_api_base)
            .finish()
    }
}

/// Fetches, overrides from the process environment, and validates the config.
pub async fn load_config(http: &Client, location: &str) -> Result<AppConfig, ConfigError> {
    load_config_with(http, location, |key| std::env::var(key).ok()).await
}

pub async fn load_config_with(
    http: &Client,
    location: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let raw = fetch_document(http, location)
        .await
        .map_err(|source| ConfigError::Fetch {
            location: location.to_string(),
            source,
        })?;
    let mut document: ConfigDocument =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            location: location.to_string(),
            source,
        })?;
    document.apply_overrides(lookup);
    document.validate()
}

async fn fetch_document(http: &Client, location: &str) -> anyhow::Result<String> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            debug!(%url, "fetching config over http");
            let response = http.get(url).send().await?;
            let body = check_status(response, "config fetch").await?.text().await?;
            Ok(body)
        }
        _ => {
            debug!(path = location, "reading config file");
            tokio::fs::read_to_string(location)
                .await
                .with_context(|| format!("failed to read '{location}'"))
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
