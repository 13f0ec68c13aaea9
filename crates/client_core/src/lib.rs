//! Session core for the Drive audio rater: configuration, Drive listing,
//! the sheet-backed rating store, and the selection/playback controller.

pub mod config;
pub mod controller;
pub mod drive;
pub mod http;
pub mod media;
pub mod session;
pub mod sheets;

pub use config::{load_config, AppConfig, ConfigError, DEFAULT_CONFIG_LOCATION};
pub use controller::{PageLoad, PlayerController};
pub use drive::{DriveClient, FileSource};
pub use http::{build_http_client, GoogleCredentials};
pub use media::MediaSink;
pub use session::{ListEntry, SessionState, SessionView};
pub use sheets::{RatingStore, SheetsClient};
