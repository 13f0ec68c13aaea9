use client_core::PlayerController;
use shared::error::SessionError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::render::render_view;

pub const HELP: &str = "\
commands:
  more         load the next page of files
  select N     select file N
  play N       play file N
  rate TEXT    edit the rating of the selected file
  save         store the rating in the sheet
  reload       reload ratings from the sheet
  show         redraw the session
  help         this text
  quit         leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    More,
    Select(usize),
    Play(usize),
    Rate(String),
    Save,
    Reload,
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`; indices are 1-based
/// on input and 0-based in the returned action.
pub fn parse_action(line: &str) -> Result<Option<ShellAction>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let action = match command.to_ascii_lowercase().as_str() {
        "more" | "m" => ShellAction::More,
        "select" | "s" => ShellAction::Select(parse_index(rest)?),
        "play" | "p" => ShellAction::Play(parse_index(rest)?),
        "rate" | "r" => ShellAction::Rate(rest.to_string()),
        "save" => ShellAction::Save,
        "reload" => ShellAction::Reload,
        "show" | "ls" => ShellAction::Show,
        "help" | "?" => ShellAction::Help,
        "quit" | "exit" | "q" => ShellAction::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(action))
}

fn parse_index(raw: &str) -> Result<usize, String> {
    let index: usize = raw
        .parse()
        .map_err(|_| format!("expected a file number, got '{raw}'"))?;
    index
        .checked_sub(1)
        .ok_or_else(|| "file numbers start at 1".to_string())
}

/// What to print after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Render,
    Message(String),
    Quit,
}

pub async fn apply_action(
    controller: &mut PlayerController,
    action: ShellAction,
) -> Result<ShellOutcome, SessionError> {
    match action {
        ShellAction::More => {
            let load = controller.load_next_page().await?;
            if load.appended == 0 && !load.has_more {
                return Ok(ShellOutcome::Message("No more files to load.".to_string()));
            }
            if load.ratings_stale {
                return Ok(ShellOutcome::Message(format!(
                    "Loaded {} audio files, but ratings could not be reloaded.",
                    load.total
                )));
            }
            Ok(ShellOutcome::Render)
        }
        ShellAction::Select(index) => {
            controller.select(index)?;
            Ok(ShellOutcome::Render)
        }
        ShellAction::Play(index) => {
            controller.play(index)?;
            Ok(ShellOutcome::Render)
        }
        ShellAction::Rate(text) => {
            controller.edit_rating(text);
            Ok(ShellOutcome::Render)
        }
        ShellAction::Save => {
            controller.save().await?;
            Ok(ShellOutcome::Message("Rating saved successfully.".to_string()))
        }
        ShellAction::Reload => {
            let count = controller.reload_ratings().await?;
            Ok(ShellOutcome::Message(format!("Loaded {count} ratings.")))
        }
        ShellAction::Show => Ok(ShellOutcome::Render),
        ShellAction::Help => Ok(ShellOutcome::Message(HELP.to_string())),
        ShellAction::Quit => Ok(ShellOutcome::Quit),
    }
}

/// Reads commands until EOF or `quit`. A failed command is reported and the
/// session continues.
pub async fn run_shell<R, W>(
    controller: &mut PlayerController,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(render_view(&controller.view()).as_bytes()).await?;
    output.write_all(b"> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = match parse_action(&line) {
            Ok(None) => String::new(),
            Ok(Some(action)) => match apply_action(controller, action).await {
                Ok(ShellOutcome::Quit) => break,
                Ok(ShellOutcome::Render) => render_view(&controller.view()),
                Ok(ShellOutcome::Message(message)) => format!("{message}\n"),
                Err(err) => format!("{err}\n"),
            },
            Err(message) => format!("{message}\n"),
        };
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await?;
    }
    output.flush().await
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
