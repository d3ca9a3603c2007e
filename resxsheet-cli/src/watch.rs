//! Re-runs the export whenever a watched workbook changes.
//!
//! File-system events and termination signals arrive on one channel and are
//! handled by a single loop, so exports never overlap.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Sender, channel};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::path_glob::WorkbookMatcher;

#[derive(Debug)]
pub enum WatchMessage {
    Fs(notify::Result<Event>),
    Signal(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Stop,
    Ignore,
}

/// Workbook paths of `event` worth exporting: creations, content writes and
/// renames. Metadata-only changes and removals are ignored.
pub fn relevant_paths(event: &Event, matcher: &WorkbookMatcher) -> Vec<PathBuf> {
    let triggers = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    );
    if !triggers {
        return Vec::new();
    }

    let unique: BTreeSet<&PathBuf> = event
        .paths
        .iter()
        .filter(|p| matcher.is_match(p))
        .collect();
    unique.into_iter().cloned().collect()
}

#[cfg(unix)]
pub fn signal_action(signal: i32) -> SignalAction {
    use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
    if [SIGINT, SIGTERM, SIGQUIT].contains(&signal) {
        SignalAction::Stop
    } else {
        SignalAction::Ignore
    }
}

// No signals are delivered on the channel here.
#[cfg(not(unix))]
pub fn signal_action(_signal: i32) -> SignalAction {
    SignalAction::Stop
}

/// Directory to watch, plus the one file name to react to when the input is a
/// single workbook. Watching the parent directory also catches editors that
/// save by replacing the file.
fn watch_scope(input: &Path) -> (PathBuf, Option<OsString>) {
    if input.is_dir() {
        return (input.to_path_buf(), None);
    }
    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, input.file_name().map(|n| n.to_os_string()))
}

#[cfg(unix)]
fn listen_for_signals(tx: Sender<WatchMessage>) -> Result<(), String> {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT, SIGHUP])
        .map_err(|e| format!("Failed to register signal handlers: {}", e))?;
    std::thread::spawn(move || {
        for signal in signals.forever() {
            if tx.send(WatchMessage::Signal(signal)).is_err() {
                break;
            }
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn listen_for_signals(_tx: Sender<WatchMessage>) -> Result<(), String> {
    Ok(())
}

/// Watches `input` (a workbook or a directory of workbooks) and calls
/// `on_change` with each changed workbook until a termination signal arrives.
pub fn watch<F>(input: &Path, mut on_change: F) -> Result<(), String>
where
    F: FnMut(&Path),
{
    let matcher = WorkbookMatcher::new()?;
    let (dir, only) = watch_scope(input);

    let (tx, rx) = channel();
    let fs_tx = tx.clone();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = fs_tx.send(WatchMessage::Fs(res));
    })
    .map_err(|e| format!("Failed to create file watcher: {}", e))?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Failed to watch directory '{}': {}", dir.display(), e))?;
    listen_for_signals(tx)?;

    info!(path = %dir.display(), "watching for workbook changes");

    for message in rx {
        match message {
            WatchMessage::Fs(Ok(event)) => {
                for path in relevant_paths(&event, &matcher) {
                    if only.as_deref().is_some_and(|name| path.file_name() != Some(name)) {
                        continue;
                    }
                    // The source side of a rename no longer exists.
                    if !path.is_file() {
                        debug!(path = %path.display(), "skipping vanished workbook");
                        continue;
                    }
                    debug!(path = %path.display(), kind = ?event.kind, "workbook changed");
                    on_change(&path);
                }
            }
            WatchMessage::Fs(Err(e)) => error!(error = %e, "file watcher error"),
            WatchMessage::Signal(signal) => match signal_action(signal) {
                SignalAction::Stop => {
                    info!(signal, "received termination signal, stopping");
                    break;
                }
                SignalAction::Ignore => warn!(signal, "received hangup signal, still watching"),
            },
        }
    }

    Ok(())
}
