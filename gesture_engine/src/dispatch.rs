//! Approved gestures → abstract OS commands.
//!
//! The dispatcher is the only stage with side effects.  It hands each
//! command to a [`CommandSink`] (keyboard / scroll injection) or, for
//! screenshots, to a [`ScreenshotSink`].  Sink failures are logged and
//! swallowed: counters advance and cooldowns stay consumed either way.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use thiserror::Error;

use crate::config::{DispatchConfig, HorizontalOutput};
use crate::gesture::GestureKind;

// ════════════════════════════════════════════════════════════════════════════
// OsCommand
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrowKey {
    Left,
    Right,
}

/// The fixed command vocabulary an input backend must understand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OsCommand {
    /// Ctrl + "+"
    IncreaseZoom,
    /// Ctrl + "-"
    DecreaseZoom,
    /// Ctrl + "0"
    ResetZoomLevel,
    ScrollBy { amount: i32, axis: ScrollAxis, direction: ScrollDirection },
    PressKey(ArrowKey),
    CaptureScreenshot,
}

impl OsCommand {
    /// The command for an approved gesture; `None` for [`GestureKind::None`].
    pub fn for_gesture(kind: GestureKind, config: &DispatchConfig) -> Option<OsCommand> {
        let amount = config.scroll_amount;
        let horizontal = |key: ArrowKey, direction: ScrollDirection| match config.horizontal {
            HorizontalOutput::ArrowKeys => OsCommand::PressKey(key),
            HorizontalOutput::Scroll    => OsCommand::ScrollBy { amount, axis: ScrollAxis::Horizontal, direction },
        };
        let cmd = match kind {
            GestureKind::ZoomIn      => OsCommand::IncreaseZoom,
            GestureKind::ZoomOut     => OsCommand::DecreaseZoom,
            GestureKind::ResetZoom   => OsCommand::ResetZoomLevel,
            GestureKind::ScrollUp    => OsCommand::ScrollBy { amount, axis: ScrollAxis::Vertical, direction: ScrollDirection::Up },
            GestureKind::ScrollDown  => OsCommand::ScrollBy { amount, axis: ScrollAxis::Vertical, direction: ScrollDirection::Down },
            GestureKind::ScrollLeft  => horizontal(ArrowKey::Left, ScrollDirection::Left),
            GestureKind::ScrollRight => horizontal(ArrowKey::Right, ScrollDirection::Right),
            GestureKind::Screenshot  => OsCommand::CaptureScreenshot,
            GestureKind::None        => return None,
        };
        Some(cmd)
    }
}

impl fmt::Display for OsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsCommand::IncreaseZoom   => write!(f, "ctrl+plus"),
            OsCommand::DecreaseZoom   => write!(f, "ctrl+minus"),
            OsCommand::ResetZoomLevel => write!(f, "ctrl+0"),
            OsCommand::ScrollBy { amount, axis, direction } => {
                write!(f, "scroll {:?} {:?} by {}", axis, direction, amount)
            }
            OsCommand::PressKey(ArrowKey::Left)  => write!(f, "key left"),
            OsCommand::PressKey(ArrowKey::Right) => write!(f, "key right"),
            OsCommand::CaptureScreenshot         => write!(f, "screenshot"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sinks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("input injection failed: {0}")]
    Injection(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not supported by this backend")]
    Unsupported(String),
}

/// Delivers keyboard and scroll commands to the OS.
pub trait CommandSink {
    fn execute(&mut self, command: &OsCommand) -> Result<(), DispatchError>;
}

/// Grabs the screen and writes it to `path`.
pub trait ScreenshotSink {
    fn capture_and_save(&mut self, path: &Path) -> Result<(), DispatchError>;
}

/// Accepts everything and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn execute(&mut self, _command: &OsCommand) -> Result<(), DispatchError> { Ok(()) }
}

impl ScreenshotSink for NullSink {
    fn capture_and_save(&mut self, _path: &Path) -> Result<(), DispatchError> { Ok(()) }
}

// ════════════════════════════════════════════════════════════════════════════
// ActionCounter
// ════════════════════════════════════════════════════════════════════════════

/// Monotonic per-kind fire counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionCounter {
    counts: [u64; GestureKind::ACTIONS.len()],
}

impl ActionCounter {
    fn slot(kind: GestureKind) -> Option<usize> {
        GestureKind::ACTIONS.iter().position(|&k| k == kind)
    }

    /// Count one fire; returns the new count for that kind.
    pub fn record(&mut self, kind: GestureKind) -> u64 {
        match ActionCounter::slot(kind) {
            Some(i) => {
                self.counts[i] += 1;
                self.counts[i]
            }
            None => 0,
        }
    }

    pub fn count(&self, kind: GestureKind) -> u64 {
        ActionCounter::slot(kind).map_or(0, |i| self.counts[i])
    }

    /// Screenshots taken; also the sequence number of the latest file.
    pub fn screenshots(&self) -> u64 {
        self.count(GestureKind::Screenshot)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(kind, count)` for every action kind, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (GestureKind, u64)> + '_ {
        GestureKind::ACTIONS.iter().copied().zip(self.counts.iter().copied())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ActionDispatcher
// ════════════════════════════════════════════════════════════════════════════

/// `screenshot_{sequence}_{unix_timestamp}.png`
pub fn screenshot_filename(sequence: u64, unix_secs: u64) -> String {
    format!("screenshot_{}_{}.png", sequence, unix_secs)
}

pub struct ActionDispatcher {
    config:      DispatchConfig,
    commands:    Box<dyn CommandSink>,
    screenshots: Box<dyn ScreenshotSink>,
    counter:     ActionCounter,
}

impl ActionDispatcher {
    pub fn new(
        config: DispatchConfig,
        commands: Box<dyn CommandSink>,
        screenshots: Box<dyn ScreenshotSink>,
    ) -> Self {
        ActionDispatcher { config, commands, screenshots, counter: ActionCounter::default() }
    }

    pub fn counter(&self) -> &ActionCounter {
        &self.counter
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Emit the command for an approved gesture.  Never fails; sink errors
    /// are logged.  Returns the command that was attempted.
    pub fn dispatch(&mut self, kind: GestureKind) -> Option<OsCommand> {
        let cmd = OsCommand::for_gesture(kind, &self.config)?;
        let n = self.counter.record(kind);

        match &cmd {
            OsCommand::CaptureScreenshot => {
                let unix = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                let path = self.config.screenshot_dir.join(screenshot_filename(n, unix));
                match self.screenshots.capture_and_save(&path) {
                    Ok(())   => info!("{} → saved {}", kind, path.display()),
                    Err(err) => warn!("{} → {} not saved: {}", kind, path.display(), err),
                }
            }
            other => match self.commands.execute(other) {
                Ok(())   => info!("{} → {}", kind, other),
                Err(err) => warn!("{} → {} failed: {}", kind, other, err),
            },
        }
        Some(cmd)
    }
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("config", &self.config)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
