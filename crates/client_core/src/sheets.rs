use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::SheetId,
    protocol::{UpdateValuesResponse, ValueRange, RATING_RANGE, VALUE_INPUT_OPTION},
};
use tracing::debug;

use crate::http::{check_status, endpoint, GoogleCredentials};

/// The two-column name/rating range of a spreadsheet.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// All populated rows of the range; an empty range yields no rows.
    async fn read_rows(&self) -> Result<Vec<Vec<String>>>;
    /// Overwrites the range with `rows`, in order.
    async fn write_rows(&self, rows: Vec<Vec<String>>) -> Result<()>;
}

pub struct SheetsClient {
    http: Client,
    api_base: String,
    sheet_id: SheetId,
    credentials: GoogleCredentials,
}

impl SheetsClient {
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        sheet_id: SheetId,
        credentials: GoogleCredentials,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            sheet_id,
            credentials,
        }
    }

    fn values_url(&self) -> Result<url::Url> {
        endpoint(
            &self.api_base,
            &["spreadsheets", self.sheet_id.as_str(), "values", RATING_RANGE],
        )
    }
}

#[async_trait]
impl RatingStore for SheetsClient {
    async fn read_rows(&self) -> Result<Vec<Vec<String>>> {
        let url = self.values_url()?;
        debug!(sheet = %self.sheet_id, range = RATING_RANGE, "reading rating range");

        let response = self
            .credentials
            .apply(self.http.get(url))
            .send()
            .await
            .context("sheets values.get request failed")?;
        let body: ValueRange = check_status(response, "sheets values.get")
            .await?
            .json()
            .await
            .context("malformed sheets values.get response")?;

        Ok(body.values.unwrap_or_default())
    }

    async fn write_rows(&self, rows: Vec<Vec<String>>) -> Result<()> {
        let url = self.values_url()?;
        let row_count = rows.len();
        debug!(sheet = %self.sheet_id, range = RATING_RANGE, rows = row_count, "overwriting rating range");

        let response = self
            .credentials
            .apply(self.http.put(url))
            .query(&[("valueInputOption", VALUE_INPUT_OPTION)])
            .json(&ValueRange::rows(RATING_RANGE, rows))
            .send()
            .await
            .context("sheets values.update request failed")?;
        let body: UpdateValuesResponse = check_status(response, "sheets values.update")
            .await?
            .json()
            .await
            .context("malformed sheets values.update response")?;

        debug!(
            sheet = %self.sheet_id,
            updated_range = body.updated_range.as_deref().unwrap_or_default(),
            updated_rows = body.updated_rows.unwrap_or_default(),
            "rating range overwritten"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sheets_tests.rs"]
mod tests;
