//! # gesture_engine
//!
//! Turns a stream of hand-landmark samples into discrete, debounced OS
//! commands.  One frame flows through a strict pipeline:
//!
//! ```text
//! LandmarkSample ─► classify ─► resolve ─► debounce ─► dispatch
//!                  (candidates) (one pose)  (approve)   (side effect)
//! ```
//!
//! Only the last stage touches the outside world, so everything up to the
//! approval decision can be exercised without any input-injection backend.
//!
//! ## Gesture → Action mapping
//!
//! | Pose | Gesture | Command |
//! |---|---|---|
//! | Fist | (none) | stop: suppresses everything |
//! | All five fingers up | ResetZoom | Ctrl+0 |
//! | Index + middle + ring up, spread | Screenshot | save `screenshot_{n}_{unix}.png` |
//! | Thumb + index up | ZoomIn / ZoomOut | Ctrl+"+" / Ctrl+"-" as the pinch opens / closes |
//! | Index + middle up | ScrollLeft / ScrollRight | arrow key (tips apart / together) |
//! | Index pointing | ScrollUp / ScrollDown | scroll wheel |
//!
//! Rows are listed in precedence order: when a hand satisfies several poses
//! the highest row wins.

pub mod gesture;
pub mod config;
pub mod classifier;
pub mod priority;
pub mod debounce;
pub mod dispatch;
pub mod engine;

pub use gesture::{CooldownGroup, GestureKind, Pose};
pub use config::{
    ClassifierConfig, ConfigError, CooldownConfig, DispatchConfig, EngineConfig, HorizontalOutput,
    ZoomConfig,
};
pub use classifier::{Classification, GestureClassifier};
pub use priority::{resolve, Resolution};
pub use debounce::{Cooldown, DebounceController, ZoomStep, ZoomTracker};
pub use dispatch::{
    screenshot_filename, ActionCounter, ActionDispatcher, ArrowKey, CommandSink, DispatchError,
    NullSink, OsCommand, ScreenshotSink, ScrollAxis, ScrollDirection,
};
pub use engine::{FrameStatus, GestureEngine, HandState};
