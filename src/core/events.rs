//! Trigger events for watch mode
//!
//! A placement pass re-runs on exactly three triggers: the trend data
//! changed, the theme changed, or the canvas was resized. Theme and size
//! both live in the config file, so the raw signal there is
//! `ConfigChanged`; the app diffs the reloaded config and re-emits the
//! specific trigger.

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// All events in the watch session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The trend data file was modified
    DataChanged,
    /// The configured theme flipped
    ThemeChanged,
    /// The configured canvas dimensions changed
    Resized(u32, u32),
    /// The config file was modified (diffed by the app)
    ConfigChanged,
    Quit,
}

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> (Self, mpsc::UnboundedSender<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// A registered file watcher
///
/// Deregistration is guaranteed: dropping the guard (or calling `stop`)
/// tears the watcher down, so no callback can fire into a dead session.
pub struct WatchGuard {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl WatchGuard {
    pub fn stop(self) {
        // Dropping the debouncer unregisters the watch
    }
}

/// Watch a single file and forward `event` on every debounced change
pub fn watch_file(
    path: &Path,
    debounce: Duration,
    tx: mpsc::UnboundedSender<Event>,
    event: Event,
) -> Result<WatchGuard> {
    let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| match result {
        Ok(changes) if !changes.is_empty() => {
            let _ = tx.send(event.clone());
        }
        Ok(_) => {}
        Err(error) => {
            tracing::warn!(%error, "file watcher error");
        }
    })?;

    debouncer
        .watcher()
        .watch(path, RecursiveMode::NonRecursive)?;

    Ok(WatchGuard {
        _debouncer: debouncer,
    })
}

/// Forward Ctrl-C as a quit event
pub fn spawn_quit_source(tx: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Quit);
        }
    });
}
