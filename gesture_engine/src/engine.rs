//! The per-frame pipeline and its telemetry.

use std::fmt;
use std::time::Instant;

use hand_pose::{LandmarkPoint, LandmarkSample};
use log::{debug, warn};

use crate::classifier::GestureClassifier;
use crate::config::EngineConfig;
use crate::debounce::DebounceController;
use crate::dispatch::{ActionCounter, ActionDispatcher, CommandSink, NullSink, OsCommand, ScreenshotSink};
use crate::gesture::{GestureKind, Pose};
use crate::priority::{resolve, Resolution};

// ════════════════════════════════════════════════════════════════════════════
// FrameStatus
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandState {
    Present,
    Missing,
    /// Points arrived but were not a valid 21-point hand.
    Malformed,
}

/// Read-only summary of one processed frame, for an overlay or console.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStatus {
    pub hand:        HandState,
    /// Winning pose, `Fist` included.
    pub pose:        Option<Pose>,
    /// Gesture that fired this frame.
    pub gesture:     GestureKind,
    pub command:     Option<OsCommand>,
    pub screenshots: u64,
}

impl FrameStatus {
    fn idle(hand: HandState, screenshots: u64) -> Self {
        FrameStatus { hand, pose: None, gesture: GestureKind::None, command: None, screenshots }
    }

    /// `NO HAND`, `STOP`, the fired action, or `READY`.
    pub fn label(&self) -> &'static str {
        if self.hand != HandState::Present {
            "NO HAND"
        } else if self.pose == Some(Pose::Fist) {
            "STOP"
        } else if !self.gesture.is_none() {
            self.gesture.label()
        } else {
            "READY"
        }
    }

    pub fn fired(&self) -> bool {
        !self.gesture.is_none()
    }
}

impl Default for FrameStatus {
    fn default() -> Self {
        FrameStatus::idle(HandState::Missing, 0)
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())?;
        if let Some(pose) = self.pose {
            write!(f, " [{}]", pose)?;
        }
        write!(f, " screenshots={}", self.screenshots)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

/// classify → resolve → debounce → dispatch, one frame at a time.
#[derive(Debug)]
pub struct GestureEngine {
    classifier: GestureClassifier,
    debounce:   DebounceController,
    dispatcher: ActionDispatcher,
    status:     FrameStatus,
}

impl GestureEngine {
    pub fn new(
        config: EngineConfig,
        commands: Box<dyn CommandSink>,
        screenshots: Box<dyn ScreenshotSink>,
    ) -> Self {
        let EngineConfig { classifier, zoom, cooldowns, dispatch } = config;
        GestureEngine {
            classifier: GestureClassifier::new(classifier),
            debounce:   DebounceController::new(&cooldowns, zoom),
            dispatcher: ActionDispatcher::new(dispatch, commands, screenshots),
            status:     FrameStatus::default(),
        }
    }

    /// An engine whose commands go nowhere.
    pub fn headless(config: EngineConfig) -> Self {
        GestureEngine::new(config, Box::new(NullSink), Box::new(NullSink))
    }

    /// The side-effect-free half of the pipeline.
    pub fn evaluate(&self, sample: &LandmarkSample) -> Resolution {
        resolve(&self.classifier.classify(sample))
    }

    /// Process one frame.  `None` means no hand was detected.
    pub fn process(&mut self, sample: Option<&LandmarkSample>, now: Instant) -> FrameStatus {
        match sample {
            Some(s) => {
                let resolution = self.evaluate(s);
                self.step(HandState::Present, &resolution, now)
            }
            None => self.step(HandState::Missing, &Resolution::Idle, now),
        }
    }

    /// Like [`process`](Self::process) but starting from raw points.  A list
    /// that is not a valid hand is handled exactly like a missing hand.
    pub fn process_points(&mut self, points: Option<&[LandmarkPoint]>, now: Instant) -> FrameStatus {
        match points.map(LandmarkSample::try_from) {
            None             => self.process(None, now),
            Some(Ok(sample)) => self.process(Some(&sample), now),
            Some(Err(err))   => {
                warn!("malformed hand sample: {}", err);
                self.step(HandState::Malformed, &Resolution::Idle, now)
            }
        }
    }

    fn step(&mut self, hand: HandState, resolution: &Resolution, now: Instant) -> FrameStatus {
        let gesture = self.debounce.approve(resolution, now);
        let command = if gesture.is_none() { None } else { self.dispatcher.dispatch(gesture) };
        let status = FrameStatus {
            hand,
            pose: resolution.pose(),
            gesture,
            command,
            screenshots: self.dispatcher.counter().screenshots(),
        };
        if status.label() != self.status.label() || status.pose != self.status.pose {
            debug!("{}", status);
        }
        self.status = status.clone();
        status
    }

    /// Status of the most recent frame.
    pub fn status(&self) -> &FrameStatus {
        &self.status
    }

    pub fn counter(&self) -> &ActionCounter {
        self.dispatcher.counter()
    }

    pub fn debounce(&self) -> &DebounceController {
        &self.debounce
    }

    /// Forget cooldowns and zoom tracking.  Counters are kept.
    pub fn reset(&mut self) {
        self.debounce.reset();
        self.status = FrameStatus::idle(HandState::Missing, self.counter().screenshots());
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::synth;
    use std::time::Duration;

    fn engine() -> GestureEngine {
        GestureEngine::headless(EngineConfig::default())
    }

    #[test]
    fn missing_hand_reads_no_hand() {
        let mut e = engine();
        let st = e.process(None, Instant::now());
        assert_eq!(st.label(), "NO HAND");
        assert!(!st.fired());
    }

    #[test]
    fn fist_reads_stop() {
        let mut e = engine();
        let st = e.process(Some(&synth::fist()), Instant::now());
        assert_eq!(st.label(), "STOP");
        assert_eq!(st.pose, Some(Pose::Fist));
        assert_eq!(st.command, None);
    }

    #[test]
    fn open_hand_fires_reset() {
        let mut e = engine();
        let st = e.process(Some(&synth::open_hand()), Instant::now());
        assert_eq!(st.gesture, GestureKind::ResetZoom);
        assert_eq!(st.command, Some(OsCommand::ResetZoomLevel));
        assert_eq!(st.label(), "RESET ZOOM");
    }

    #[test]
    fn held_pose_reads_ready_between_fires() {
        let t0 = Instant::now();
        let mut e = engine();
        e.process(Some(&synth::open_hand()), t0);
        let st = e.process(Some(&synth::open_hand()), t0 + Duration::from_millis(33));
        assert_eq!(st.label(), "READY");
        assert_eq!(st.pose, Some(Pose::AllFingersUp));
    }

    #[test]
    fn short_point_list_is_malformed() {
        let mut e = engine();
        let points = synth::pinch(0.1).points().to_vec();
        e.process_points(Some(&points), Instant::now());
        assert!(e.debounce().zoom().is_active());

        let st = e.process_points(Some(&points[..20]), Instant::now());
        assert_eq!(st.hand, HandState::Malformed);
        assert_eq!(st.label(), "NO HAND");
        assert!(!e.debounce().zoom().is_active());
    }

    #[test]
    fn nan_point_is_malformed() {
        let mut e = engine();
        let mut points = synth::open_hand().points().to_vec();
        points[4].x = f32::NAN;
        let st = e.process_points(Some(&points), Instant::now());
        assert_eq!(st.hand, HandState::Malformed);
        assert!(!st.fired());
    }

    #[test]
    fn evaluate_does_not_consume_cooldown() {
        let mut e = engine();
        let hand = synth::three_fingers();
        for _ in 0..3 {
            assert_eq!(e.evaluate(&hand).kind(), GestureKind::Screenshot);
        }
        assert_eq!(e.process(Some(&hand), Instant::now()).gesture, GestureKind::Screenshot);
    }

    #[test]
    fn reset_keeps_counters() {
        let t0 = Instant::now();
        let mut e = engine();
        e.process(Some(&synth::three_fingers()), t0);
        e.reset();
        assert_eq!(e.counter().screenshots(), 1);
        let st = e.process(Some(&synth::three_fingers()), t0 + Duration::from_millis(10));
        assert_eq!(st.gesture, GestureKind::Screenshot);
        assert_eq!(st.screenshots, 2);
    }
}
