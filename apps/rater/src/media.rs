use std::{
    process::{Child, Command, Stdio},
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result};
use client_core::MediaSink;
use tracing::{debug, info};

/// Announces stream URLs and optionally hands them to an external player.
///
/// At most one player runs at a time: starting a new stream stops and reaps
/// the previous player process first.
pub struct ConsoleMedia {
    player: Option<String>,
    current: Mutex<Option<Child>>,
}

impl ConsoleMedia {
    pub fn new(player: Option<String>) -> Self {
        Self {
            player,
            current: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn current_pid(&self) -> Option<u32> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Child::id)
    }
}

fn stop(mut child: Child) {
    // Fails only when the process already exited; `wait` reaps it either way.
    let _ = child.kill();
    match child.wait() {
        Ok(status) => debug!(pid = child.id(), %status, "stopped previous player"),
        Err(err) => debug!(pid = child.id(), error = %err, "failed to reap previous player"),
    }
}

impl MediaSink for ConsoleMedia {
    fn play(&self, url: &str) -> Result<()> {
        let Some(player) = self.player.as_deref() else {
            println!("stream: {url}");
            return Ok(());
        };

        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            stop(previous);
        }

        let child = Command::new(player)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch player '{player}'"))?;
        info!(player, pid = child.id(), "started external player");
        *current = Some(child);
        Ok(())
    }
}

impl Drop for ConsoleMedia {
    fn drop(&mut self) {
        let current = self.current.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(child) = current.take() {
            stop(child);
        }
    }
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
