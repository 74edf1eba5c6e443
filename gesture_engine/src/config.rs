//! Engine tunables, loadable from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a complete
//! configuration.  Durations are written in seconds as floats:
//!
//! ```toml
//! [classifier]
//! horizontal_gap = 0.05
//!
//! [cooldowns]
//! zoom = 0.5
//! screenshot = 2.0
//!
//! [dispatch]
//! horizontal = "arrow-keys"
//! screenshot_dir = "shots"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::CooldownGroup;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Pointing needs mcp→tip above this fraction of the full finger length.
    pub pointing_straightness: f32,
    /// Minimum x-gap between adjacent raised tips for the three-finger pose.
    pub finger_separation:     f32,
    /// Two-finger x-gap below this scrolls right, above it scrolls left.
    pub horizontal_gap:        f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            pointing_straightness: 0.7,
            finger_separation:     0.03,
            horizontal_gap:        0.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Moving-average length for the thumb–index distance.
    pub smoothing_window: usize,
    /// Absolute floor of the fire threshold.
    pub min_change:       f32,
    /// Fire threshold as a fraction of the baseline distance.
    pub relative_factor:  f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        ZoomConfig { smoothing_window: 5, min_change: 0.03, relative_factor: 0.1 }
    }
}

impl ZoomConfig {
    /// `max(min_change, initial × relative_factor)`.
    pub fn threshold(&self, initial_distance: f32) -> f32 {
        self.min_change.max(initial_distance * self.relative_factor)
    }
}

/// Cooldown per group, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    pub zoom:              f64,
    pub reset:             f64,
    pub screenshot:        f64,
    pub vertical_scroll:   f64,
    pub horizontal_scroll: f64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        CooldownConfig {
            zoom:              0.5,
            reset:             2.0,
            screenshot:        2.0,
            vertical_scroll:   0.1,
            horizontal_scroll: 0.1,
        }
    }
}

impl CooldownConfig {
    pub fn seconds(&self, group: CooldownGroup) -> f64 {
        match group {
            CooldownGroup::Zoom             => self.zoom,
            CooldownGroup::Reset            => self.reset,
            CooldownGroup::Screenshot       => self.screenshot,
            CooldownGroup::VerticalScroll   => self.vertical_scroll,
            CooldownGroup::HorizontalScroll => self.horizontal_scroll,
        }
    }

    /// Values too large for a `Duration` saturate to `Duration::MAX`, so a
    /// huge cooldown means "fire once".  Negative and NaN values collapse to
    /// zero; [`EngineConfig::validate`] rejects them before they get here.
    pub fn duration(&self, group: CooldownGroup) -> Duration {
        let secs = self.seconds(group);
        if secs >= Duration::MAX.as_secs_f64() {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

/// How the two-finger pose drives horizontal movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HorizontalOutput {
    /// Left / right arrow key presses.
    ArrowKeys,
    /// Horizontal scroll-wheel deltas.
    Scroll,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Wheel units per scroll action.
    pub scroll_amount:  i32,
    pub horizontal:     HorizontalOutput,
    /// Directory that screenshot files are written into.
    pub screenshot_dir: PathBuf,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            scroll_amount:  40,
            horizontal:     HorizontalOutput::ArrowKeys,
            screenshot_dir: PathBuf::from("."),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EngineConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub zoom:       ZoomConfig,
    pub cooldowns:  CooldownConfig,
    pub dispatch:   DispatchConfig,
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        EngineConfig::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("classifier.pointing_straightness", self.classifier.pointing_straightness as f64)?;
        non_negative("classifier.finger_separation", self.classifier.finger_separation as f64)?;
        non_negative("classifier.horizontal_gap", self.classifier.horizontal_gap as f64)?;
        non_negative("zoom.min_change", self.zoom.min_change as f64)?;
        non_negative("zoom.relative_factor", self.zoom.relative_factor as f64)?;
        if self.zoom.smoothing_window == 0 {
            return Err(ConfigError::Invalid {
                field:  "zoom.smoothing_window",
                reason: "must be at least 1".into(),
            });
        }
        for group in CooldownGroup::ALL {
            let field = match group {
                CooldownGroup::Zoom             => "cooldowns.zoom",
                CooldownGroup::Reset            => "cooldowns.reset",
                CooldownGroup::Screenshot       => "cooldowns.screenshot",
                CooldownGroup::VerticalScroll   => "cooldowns.vertical_scroll",
                CooldownGroup::HorizontalScroll => "cooldowns.horizontal_scroll",
            };
            non_negative(field, self.cooldowns.seconds(group))?;
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("must be a finite non-negative number, got {}", value) })
    }
}
