use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{build_http_client, load_config, PlayerController};
use shared::protocol::{stream_url, OAUTH_SCOPES};
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod media;
mod render;
mod shell;

use cli::{Cli, Command};
use media::ConsoleMedia;
use render::render_list;

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref());

    let http = build_http_client().inspect_err(|err| {
        error!(error = %format!("{err:#}"), "failed to initialize API clients");
    })?;
    let config = load_config(&http, &cli.config).await.inspect_err(|err| {
        error!(location = %cli.config, error = %err, "Error loading config");
    })?;
    info!(
        client_id = %config.client_id,
        sheet = %config.sheet_id,
        folder = ?config.drive_folder_id,
        scopes = ?OAUTH_SCOPES,
        "Initialization successful"
    );
    if config.access_token.is_none() {
        warn!("no access token configured; the sheet will reject rating writes");
    }

    let media = Arc::new(ConsoleMedia::new(cli.player.clone()));
    let mut controller = PlayerController::from_config(&config, http, media);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            // Failures are already logged; the shell still opens so the user can retry.
            let _ = controller.load_next_page().await;
            let stdin = BufReader::new(tokio::io::stdin());
            shell::run_shell(&mut controller, stdin, tokio::io::stdout()).await?;
        }
        Command::List => {
            controller.load_all_pages().await?;
            let view = controller.view();
            print!("{}", render_list(&view));
            println!("{}", view.loading_status);
        }
        Command::Rate { index, rating } => {
            let index = load_through(&mut controller, index).await?;
            // A save overwrites the whole sheet, so it must merge into a fresh table.
            controller.reload_ratings().await?;
            controller.select(index)?;
            controller.edit_rating(rating);
            controller.save().await?;
            let view = controller.view();
            println!("{}", view.current_label);
            println!("Rating: {}", view.rating_field);
        }
        Command::Url { index } => {
            let index = load_through(&mut controller, index).await?;
            let file = controller.state().file(index)?;
            println!("{}", stream_url(&file.id));
        }
    }

    Ok(())
}

/// Loads pages until the 1-based `number` is listed or the folder runs out,
/// returning the 0-based index.
async fn load_through(controller: &mut PlayerController, number: usize) -> Result<usize> {
    let Some(index) = number.checked_sub(1) else {
        bail!("file numbers start at 1");
    };
    while controller.state().files().len() <= index && controller.state().has_more_pages() {
        controller.load_next_page().await?;
    }
    Ok(index)
}
