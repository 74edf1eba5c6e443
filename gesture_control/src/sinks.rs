//! Command and screenshot backends.
//!
//! The default backends only log what they would do.  With the `desktop`
//! feature, [`DesktopCommandSink`] injects real key chords and wheel events
//! through enigo and [`DesktopScreenshotSink`] grabs the primary monitor with
//! xcap.

use std::path::Path;

use gesture_engine::{CommandSink, DispatchError, OsCommand, ScreenshotSink};
use log::{info, warn};

// ── dry-run backends ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
pub struct LogCommandSink;

impl CommandSink for LogCommandSink {
    fn execute(&mut self, command: &OsCommand) -> Result<(), DispatchError> {
        info!("[dry-run] {}", command);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogScreenshotSink;

impl ScreenshotSink for LogScreenshotSink {
    fn capture_and_save(&mut self, path: &Path) -> Result<(), DispatchError> {
        info!("[dry-run] would save {}", path.display());
        Ok(())
    }
}

// ── enigo backend ─────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
pub struct DesktopCommandSink {
    enigo: enigo::Enigo,
}

#[cfg(feature = "desktop")]
impl DesktopCommandSink {
    pub fn new() -> Result<Self, DispatchError> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default())
            .map_err(|e| DispatchError::Injection(format!("{:?}", e)))?;
        Ok(DesktopCommandSink { enigo })
    }

    /// Ctrl + `c`.  Control is released even when the key press fails.
    fn ctrl_chord(&mut self, c: char) -> Result<(), DispatchError> {
        use enigo::{Direction, Key, Keyboard};
        let inject = |e: enigo::InputError| DispatchError::Injection(format!("{:?}", e));

        self.enigo.key(Key::Control, Direction::Press).map_err(inject)?;
        let pressed = self.enigo.key(Key::Unicode(c), Direction::Click).map_err(inject);
        self.enigo.key(Key::Control, Direction::Release).map_err(inject)?;
        pressed
    }
}

#[cfg(feature = "desktop")]
impl CommandSink for DesktopCommandSink {
    fn execute(&mut self, command: &OsCommand) -> Result<(), DispatchError> {
        use enigo::{Axis, Direction, Key, Keyboard, Mouse};
        use gesture_engine::{ArrowKey, ScrollAxis, ScrollDirection};
        let inject = |e: enigo::InputError| DispatchError::Injection(format!("{:?}", e));

        match command {
            OsCommand::IncreaseZoom   => self.ctrl_chord('+'),
            OsCommand::DecreaseZoom   => self.ctrl_chord('-'),
            OsCommand::ResetZoomLevel => self.ctrl_chord('0'),
            OsCommand::ScrollBy { amount, axis, direction } => {
                // enigo scrolls down / right for positive lengths
                let length = match direction {
                    ScrollDirection::Up | ScrollDirection::Left    => -amount,
                    ScrollDirection::Down | ScrollDirection::Right => *amount,
                };
                let axis = match axis {
                    ScrollAxis::Vertical   => Axis::Vertical,
                    ScrollAxis::Horizontal => Axis::Horizontal,
                };
                self.enigo.scroll(length, axis).map_err(inject)
            }
            OsCommand::PressKey(ArrowKey::Left)  => self.enigo.key(Key::LeftArrow, Direction::Click).map_err(inject),
            OsCommand::PressKey(ArrowKey::Right) => self.enigo.key(Key::RightArrow, Direction::Click).map_err(inject),
            OsCommand::CaptureScreenshot => Err(DispatchError::Unsupported(command.to_string())),
        }
    }
}

// ── xcap backend ──────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopScreenshotSink;

#[cfg(feature = "desktop")]
impl ScreenshotSink for DesktopScreenshotSink {
    fn capture_and_save(&mut self, path: &Path) -> Result<(), DispatchError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|source| DispatchError::Io { path: dir.to_path_buf(), source })?;
        }
        let monitor = xcap::Monitor::all()
            .map_err(|e| DispatchError::Capture(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| DispatchError::Capture("no monitor found".into()))?;
        let image = monitor.capture_image().map_err(|e| DispatchError::Capture(e.to_string()))?;
        image.save(path).map_err(|e| DispatchError::Capture(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_sinks: real backends when asked for, dry-run otherwise
// ════════════════════════════════════════════════════════════════════════════

/// Pick the backends.  Falls back to the dry-run sinks with a warning when
/// the desktop backend is unavailable.
pub fn open_sinks(desktop: bool) -> (Box<dyn CommandSink>, Box<dyn ScreenshotSink>) {
    if !desktop {
        return (Box::new(LogCommandSink), Box::new(LogScreenshotSink));
    }

    #[cfg(feature = "desktop")]
    {
        match DesktopCommandSink::new() {
            Ok(cmd) => return (Box::new(cmd), Box::new(DesktopScreenshotSink)),
            Err(e)  => warn!("{}; using dry-run output", e),
        }
    }
    #[cfg(not(feature = "desktop"))]
    warn!("built without the `desktop` feature; using dry-run output");

    (Box::new(LogCommandSink), Box::new(LogScreenshotSink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_engine::{ArrowKey, ScrollAxis, ScrollDirection};

    #[test]
    fn dry_run_accepts_everything() {
        let mut sink = LogCommandSink;
        for cmd in [
            OsCommand::IncreaseZoom,
            OsCommand::ResetZoomLevel,
            OsCommand::PressKey(ArrowKey::Left),
            OsCommand::ScrollBy { amount: 40, axis: ScrollAxis::Vertical, direction: ScrollDirection::Up },
        ] {
            assert!(sink.execute(&cmd).is_ok());
        }
        assert!(LogScreenshotSink.capture_and_save(Path::new("shots/screenshot_1_0.png")).is_ok());
    }

    #[cfg(not(feature = "desktop"))]
    #[test]
    fn desktop_request_falls_back_without_feature() {
        let (mut cmd, mut shot) = open_sinks(true);
        assert!(cmd.execute(&OsCommand::DecreaseZoom).is_ok());
        assert!(shot.capture_and_save(Path::new("x.png")).is_ok());
    }
}
