use clap::{Parser, Subcommand};
use client_core::DEFAULT_CONFIG_LOCATION;

/// Lists audio files from a Drive folder, plays them, and keeps ratings in a sheet.
#[derive(Parser, Debug)]
#[command(name = "rater", version)]
pub struct Cli {
    /// Config document: a file path or an http(s) URL.
    #[arg(long, env = "RATER_CONFIG", default_value = DEFAULT_CONFIG_LOCATION)]
    pub config: String,
    /// tracing filter directive; falls back to RUST_LOG, then "info".
    #[arg(long)]
    pub log_filter: Option<String>,
    /// Player command launched with the stream URL as its only argument.
    #[arg(long, env = "RATER_PLAYER")]
    pub player: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive session (default).
    Shell,
    /// Load every page and print the files with their ratings.
    List,
    /// Set the rating of the file at INDEX (1-based) and save it.
    Rate { index: usize, rating: String },
    /// Print the playable URL of the file at INDEX (1-based).
    Url { index: usize },
}
