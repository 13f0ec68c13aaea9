use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Config,
    Init,
    Listing,
    RatingRead,
    RatingWrite,
    Selection,
    Playback,
}

impl FailureKind {
    pub fn describe(self) -> &'static str {
        match self {
            FailureKind::Config => "loading configuration",
            FailureKind::Init => "initializing API clients",
            FailureKind::Listing => "loading audio files",
            FailureKind::RatingRead => "loading ratings from sheet",
            FailureKind::RatingWrite => "saving rating",
            FailureKind::Selection => "selecting audio file",
            FailureKind::Playback => "starting playback",
        }
    }
}

/// A failed session operation. Session state is unchanged when one is returned.
#[derive(Debug, Error)]
#[error("error {}: {message}", .kind.describe())]
pub struct SessionError {
    pub kind: FailureKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is(&self, kind: FailureKind) -> bool {
        self.kind == kind
    }
}
