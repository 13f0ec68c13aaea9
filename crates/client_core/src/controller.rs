use std::sync::Arc;

use reqwest::Client;
use shared::{
    domain::{FolderId, RatingChange, RatingTable},
    error::{FailureKind, SessionError},
    protocol::stream_url,
};
use tracing::{error, info, warn};

use crate::{
    config::AppConfig,
    drive::{DriveClient, FileSource},
    media::MediaSink,
    session::{SessionState, SessionView},
    sheets::{RatingStore, SheetsClient},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoad {
    pub appended: usize,
    pub total: usize,
    pub has_more: bool,
    /// Set when the ratings reload after this page failed. The listed files
    /// are kept and the previous ratings stay in place.
    pub ratings_stale: bool,
}

/// Drives the session: listing, selection, playback, and rating saves.
///
/// Every failure is logged as a [`SessionError`] and never blocks the next
/// operation. A page load keeps its appended files even when the ratings
/// reload that follows it fails; that is reported through
/// [`PageLoad::ratings_stale`] rather than as an error.
pub struct PlayerController {
    files: Arc<dyn FileSource>,
    ratings: Arc<dyn RatingStore>,
    media: Arc<dyn MediaSink>,
    folder_id: Option<FolderId>,
    state: SessionState,
}

impl PlayerController {
    pub fn new(
        files: Arc<dyn FileSource>,
        ratings: Arc<dyn RatingStore>,
        media: Arc<dyn MediaSink>,
        folder_id: Option<FolderId>,
    ) -> Self {
        Self {
            files,
            ratings,
            media,
            folder_id,
            state: SessionState::new(),
        }
    }

    pub fn from_config(config: &AppConfig, http: Client, media: Arc<dyn MediaSink>) -> Self {
        let credentials = config.credentials();
        let files = DriveClient::new(
            http.clone(),
            config.drive_api_base.clone(),
            credentials.clone(),
        );
        let ratings = SheetsClient::new(
            http,
            config.sheets_api_base.clone(),
            config.sheet_id.clone(),
            credentials,
        );
        Self::new(
            Arc::new(files),
            Arc::new(ratings),
            media,
            config.drive_folder_id.clone(),
        )
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn view(&self) -> SessionView {
        self.state.view()
    }

    /// Lists the next page, then reloads ratings and refreshes the rating
    /// field, in that order.
    pub async fn load_next_page(&mut self) -> Result<PageLoad, SessionError> {
        if !self.state.has_more_pages() {
            return Ok(self.page_load(0, false));
        }

        let Some(folder_id) = self.folder_id.clone() else {
            return Err(log_failure(SessionError::new(
                FailureKind::Listing,
                "no source folder is configured (driveFolderId)",
            )));
        };

        let page = self
            .files
            .list_page(&folder_id, self.state.next_page_token())
            .await
            .map_err(|err| failure(FailureKind::Listing, err))?;

        let appended = self.state.append_page(page);
        info!(
            folder = %folder_id,
            appended,
            total = self.state.files().len(),
            has_more = self.state.has_more_pages(),
            "Loaded {} audio files.",
            self.state.files().len()
        );

        // Already logged by `reload_ratings`; paging carries on regardless.
        let ratings_stale = self.reload_ratings().await.is_err();
        Ok(self.page_load(appended, ratings_stale))
    }

    pub async fn load_all_pages(&mut self) -> Result<usize, SessionError> {
        loop {
            let load = self.load_next_page().await?;
            if !load.has_more {
                return Ok(load.total);
            }
        }
    }

    /// Replaces the in-memory ratings with the sheet's contents. Unsaved edits
    /// in the rating field are discarded.
    pub async fn reload_ratings(&mut self) -> Result<usize, SessionError> {
        let rows = self
            .ratings
            .read_rows()
            .await
            .map_err(|err| failure(FailureKind::RatingRead, err))?;

        let table = RatingTable::from_rows(rows);
        let count = table.len();
        self.state.replace_ratings(table);
        self.state.refresh_rating_field();
        info!(ratings = count, "loaded ratings from sheet");
        Ok(count)
    }

    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        self.state.select(index).map_err(log_failure)
    }

    /// Hands the file's stream URL to the media sink and selects it.
    pub fn play(&mut self, index: usize) -> Result<String, SessionError> {
        let file = self.state.file(index).map_err(log_failure)?;
        let url = stream_url(&file.id);
        let name = file.name.clone();

        self.media.play(&url).map_err(|err| failure(FailureKind::Playback, err))?;

        self.state.select(index).map_err(log_failure)?;
        self.state.set_now_playing(url.clone());
        info!(file = %name, %url, "playing audio");
        Ok(url)
    }

    pub fn edit_rating(&mut self, text: impl Into<String>) {
        self.state.edit_rating(text);
    }

    /// Merges the rating field into the table for the selected file and
    /// overwrites the whole sheet range with it. The merge is only kept once
    /// the write succeeds.
    pub async fn save(&mut self) -> Result<RatingChange, SessionError> {
        let (merged, change) = self.state.merged_ratings().map_err(log_failure)?;

        self.ratings
            .write_rows(merged.to_rows())
            .await
            .map_err(|err| failure(FailureKind::RatingWrite, err))?;

        let rows = merged.len();
        self.state.commit_save(merged);
        info!(?change, rows, "Rating saved successfully");
        Ok(change)
    }

    fn page_load(&self, appended: usize, ratings_stale: bool) -> PageLoad {
        PageLoad {
            appended,
            total: self.state.files().len(),
            has_more: self.state.has_more_pages(),
            ratings_stale,
        }
    }
}

fn failure(kind: FailureKind, err: anyhow::Error) -> SessionError {
    log_failure(SessionError::new(kind, format!("{err:#}")))
}

fn log_failure(err: SessionError) -> SessionError {
    match err.kind {
        FailureKind::Selection => warn!(kind = ?err.kind, error = %err, "rejected session operation"),
        _ => error!(kind = ?err.kind, error = %err, "session operation failed"),
    }
    err
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
