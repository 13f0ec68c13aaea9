use shared::{
    domain::{AudioFile, RatingChange, RatingTable},
    error::{FailureKind, SessionError},
    protocol::DriveFileList,
};

/// Everything the player knows about the current session. Nothing here is
/// persisted; the sheet is the only durable state.
#[derive(Debug, Default)]
pub struct SessionState {
    files: Vec<AudioFile>,
    ratings: RatingTable,
    next_page_token: Option<String>,
    first_page_loaded: bool,
    current_index: usize,
    rating_field: String,
    save_pending: bool,
    now_playing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub rating: Option<String>,
    pub selected: bool,
}

/// Render model for whatever surface displays the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub entries: Vec<ListEntry>,
    pub loading_status: String,
    pub current_label: String,
    pub rating_field: String,
    pub save_visible: bool,
    pub now_playing: Option<String>,
    pub has_more: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[AudioFile] {
        &self.files
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// True until a page arrives without a continuation token.
    pub fn has_more_pages(&self) -> bool {
        !self.first_page_loaded || self.next_page_token.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_file(&self) -> Option<&AudioFile> {
        self.files.get(self.current_index)
    }

    pub fn rating_field(&self) -> &str {
        &self.rating_field
    }

    pub fn save_pending(&self) -> bool {
        self.save_pending
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// Appends a listed page and advances the cursor. Returns how many files
    /// were added.
    pub fn append_page(&mut self, page: DriveFileList) -> usize {
        let appended = page.files.len();
        self.files.extend(page.files);
        self.next_page_token = page.next_page_token;
        self.first_page_loaded = true;
        appended
    }

    pub fn replace_ratings(&mut self, ratings: RatingTable) {
        self.ratings = ratings;
    }

    pub fn file(&self, index: usize) -> Result<&AudioFile, SessionError> {
        if self.files.is_empty() {
            return Err(SessionError::new(
                FailureKind::Selection,
                "no audio files are loaded",
            ));
        }
        self.files.get(index).ok_or_else(|| {
            SessionError::new(
                FailureKind::Selection,
                format!(
                    "index {} is out of range for {} loaded files",
                    index + 1,
                    self.files.len()
                ),
            )
        })
    }

    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        self.file(index)?;
        self.current_index = index;
        self.refresh_rating_field();
        Ok(())
    }

    /// Shows the stored rating for the current file, or clears the field.
    pub fn refresh_rating_field(&mut self) {
        self.rating_field = self
            .current_file()
            .and_then(|file| self.ratings.lookup(&file.name))
            .map(|entry| entry.rating.clone())
            .unwrap_or_default();
    }

    pub fn edit_rating(&mut self, text: impl Into<String>) {
        self.rating_field = text.into();
        self.save_pending = true;
    }

    pub fn set_now_playing(&mut self, url: String) {
        self.now_playing = Some(url);
    }

    /// The table a save would write: the current ratings with the selected
    /// file's entry updated or appended. The session itself is not modified.
    pub fn merged_ratings(&self) -> Result<(RatingTable, RatingChange), SessionError> {
        let file = self.file(self.current_index)?;
        let mut merged = self.ratings.clone();
        let change = merged.upsert(&file.name, &self.rating_field);
        Ok((merged, change))
    }

    pub fn commit_save(&mut self, ratings: RatingTable) {
        self.ratings = ratings;
        self.save_pending = false;
    }

    pub fn view(&self) -> SessionView {
        let entries = self
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| ListEntry {
                name: file.name.clone(),
                rating: self
                    .ratings
                    .lookup(&file.name)
                    .map(|entry| entry.rating.clone()),
                selected: index == self.current_index,
            })
            .collect();

        SessionView {
            entries,
            loading_status: format!("Loaded {} audio files.", self.files.len()),
            current_label: format!("Currently selected audio: {}", self.current_index + 1),
            rating_field: self.rating_field.clone(),
            save_visible: self.save_pending,
            now_playing: self.now_playing.clone(),
            has_more: self.has_more_pages(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
