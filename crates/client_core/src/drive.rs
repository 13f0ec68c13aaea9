use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::{
    domain::FolderId,
    protocol::{folder_query, DriveFileList, LIST_FIELDS, LIST_ORDER_BY, LIST_PAGE_SIZE},
};
use tracing::debug;

use crate::http::{check_status, endpoint, GoogleCredentials};

/// One page of a folder listing.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn list_page(&self, folder_id: &FolderId, page_token: Option<&str>)
        -> Result<DriveFileList>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesQuery<'a> {
    q: String,
    fields: &'a str,
    order_by: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

/// Drive v3 `files.list` scoped to a parent folder, ordered by name.
pub struct DriveClient {
    http: Client,
    api_base: String,
    credentials: GoogleCredentials,
}

impl DriveClient {
    pub fn new(http: Client, api_base: impl Into<String>, credentials: GoogleCredentials) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            credentials,
        }
    }
}

#[async_trait]
impl FileSource for DriveClient {
    async fn list_page(
        &self,
        folder_id: &FolderId,
        page_token: Option<&str>,
    ) -> Result<DriveFileList> {
        let url = endpoint(&self.api_base, &["files"])?;
        let query = ListFilesQuery {
            q: folder_query(folder_id.as_str()),
            fields: LIST_FIELDS,
            order_by: LIST_ORDER_BY,
            page_size: LIST_PAGE_SIZE,
            page_token,
        };
        debug!(folder = %folder_id, ?page_token, "requesting drive file page");

        let request = self.credentials.apply(self.http.get(url).query(&query));
        let response = request.send().await.context("drive files.list request failed")?;
        let page: DriveFileList = check_status(response, "drive files.list")
            .await?
            .json()
            .await
            .context("malformed drive files.list response")?;

        debug!(
            folder = %folder_id,
            files = page.files.len(),
            has_more = page.next_page_token.is_some(),
            "received drive file page"
        );
        Ok(page)
    }
}

#[cfg(test)]
#[path = "tests/drive_tests.rs"]
mod tests;
