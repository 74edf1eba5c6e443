//! Decides whether a resolved pose may fire this frame.
//!
//! Two pieces of state live here and nowhere else:
//!
//! * one [`Cooldown`] per [`CooldownGroup`], touched only on a successful fire;
//! * a [`ZoomTracker`] holding the smoothed thumb–index distance history,
//!   wiped whenever the zoom pose stops winning.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::debug;

use crate::config::{CooldownConfig, ZoomConfig};
use crate::gesture::{CooldownGroup, GestureKind};
use crate::priority::Resolution;

// ════════════════════════════════════════════════════════════════════════════
// Cooldown
// ════════════════════════════════════════════════════════════════════════════

/// Rate limiter for one group of gesture kinds.
#[derive(Clone, Debug)]
pub struct Cooldown {
    group:      CooldownGroup,
    duration:   Duration,
    continuous: bool,
    /// `None` until the first fire, so the very first request is always ready.
    last_fire:  Option<Instant>,
}

impl Cooldown {
    pub fn new(group: CooldownGroup, duration: Duration) -> Self {
        Cooldown { group, duration, continuous: group.is_continuous(), last_fire: None }
    }

    pub fn group(&self) -> CooldownGroup { self.group }
    pub fn duration(&self) -> Duration { self.duration }
    pub fn is_continuous(&self) -> bool { self.continuous }
    pub fn last_fire(&self) -> Option<Instant> { self.last_fire }

    /// `now − last_fire ≥ duration`.  A timestamp earlier than the last fire
    /// counts as zero elapsed time.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_fire {
            None       => true,
            Some(last) => now.saturating_duration_since(last) >= self.duration,
        }
    }

    /// Fire if ready.  A refused request changes nothing.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.is_ready(now) {
            self.last_fire = Some(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_fire = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ZoomTracker
// ════════════════════════════════════════════════════════════════════════════

/// What one zoom-eligible frame did to the tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomStep {
    /// First frame of the pose: the baseline was captured, nothing fires.
    Baseline { distance: f32 },
    /// Movement below the threshold.
    Steady { smoothed: f32, diff: f32 },
    /// Movement above the threshold; fires if the zoom cooldown allows.
    Proposal { kind: GestureKind, smoothed: f32, diff: f32 },
}

#[derive(Clone, Debug)]
pub struct ZoomTracker {
    config:            ZoomConfig,
    buffer:            VecDeque<f32>,
    initial_distance:  Option<f32>,
    previous_distance: Option<f32>,
    active:            bool,
}

impl ZoomTracker {
    pub fn new(config: ZoomConfig) -> Self {
        let window = config.smoothing_window.max(1);
        ZoomTracker {
            config,
            buffer:            VecDeque::with_capacity(window),
            initial_distance:  None,
            previous_distance: None,
            active:            false,
        }
    }

    pub fn is_active(&self) -> bool { self.active }
    pub fn initial_distance(&self) -> Option<f32> { self.initial_distance }
    pub fn previous_distance(&self) -> Option<f32> { self.previous_distance }
    pub fn buffered(&self) -> usize { self.buffer.len() }

    pub fn smoothed(&self) -> Option<f32> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer.iter().sum::<f32>() / self.buffer.len() as f32)
        }
    }

    /// Feed the current thumb–index distance.
    pub fn observe(&mut self, distance: f32) -> ZoomStep {
        if !self.active {
            self.active = true;
            self.buffer.clear();
            self.buffer.push_back(distance);
            self.initial_distance = Some(distance);
            self.previous_distance = Some(distance);
            return ZoomStep::Baseline { distance };
        }

        while self.buffer.len() >= self.config.smoothing_window.max(1) {
            self.buffer.pop_front();
        }
        self.buffer.push_back(distance);

        let smoothed = self.smoothed().unwrap_or(distance);
        let previous = self.previous_distance.unwrap_or(smoothed);
        let initial = self.initial_distance.unwrap_or(previous);
        let diff = smoothed - previous;

        if diff.abs() > self.config.threshold(initial) {
            let kind = if diff > 0.0 { GestureKind::ZoomIn } else { GestureKind::ZoomOut };
            ZoomStep::Proposal { kind, smoothed, diff }
        } else {
            ZoomStep::Steady { smoothed, diff }
        }
    }

    /// A proposal fired: measure the next change from here.
    pub fn commit(&mut self, smoothed: f32) {
        self.previous_distance = Some(smoothed);
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.initial_distance = None;
        self.previous_distance = None;
        self.active = false;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DebounceController
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct DebounceController {
    cooldowns: [Cooldown; 5],
    zoom:      ZoomTracker,
}

impl DebounceController {
    pub fn new(cooldowns: &CooldownConfig, zoom: ZoomConfig) -> Self {
        DebounceController {
            cooldowns: CooldownGroup::ALL.map(|g| Cooldown::new(g, cooldowns.duration(g))),
            zoom:      ZoomTracker::new(zoom),
        }
    }

    pub fn cooldown(&self, group: CooldownGroup) -> &Cooldown {
        &self.cooldowns[group.index()]
    }

    pub fn zoom(&self) -> &ZoomTracker {
        &self.zoom
    }

    /// The gesture allowed to fire this frame, or `GestureKind::None`.
    pub fn approve(&mut self, resolution: &Resolution, now: Instant) -> GestureKind {
        if let Some(distance) = resolution.zoom_distance() {
            return self.approve_zoom(distance, now);
        }
        if self.zoom.is_active() {
            debug!("zoom pose released, tracking reset");
        }
        self.zoom.reset();

        let kind = resolution.kind();
        let Some(group) = kind.cooldown_group() else {
            return GestureKind::None;
        };
        if self.cooldowns[group.index()].try_fire(now) {
            kind
        } else {
            debug!("{} suppressed: {} cooldown", kind, group.name());
            GestureKind::None
        }
    }

    fn approve_zoom(&mut self, distance: f32, now: Instant) -> GestureKind {
        match self.zoom.observe(distance) {
            ZoomStep::Baseline { distance } => {
                debug!("zoom baseline {:.3}", distance);
                GestureKind::None
            }
            ZoomStep::Steady { .. } => GestureKind::None,
            ZoomStep::Proposal { kind, smoothed, diff } => {
                if self.cooldowns[CooldownGroup::Zoom.index()].try_fire(now) {
                    self.zoom.commit(smoothed);
                    kind
                } else {
                    debug!("{} suppressed: zoom cooldown (diff {:+.3})", kind, diff);
                    GestureKind::None
                }
            }
        }
    }

    /// Drop zoom tracking only; cooldowns keep running.
    pub fn reset_tracking(&mut self) {
        self.zoom.reset();
    }

    /// Back to the freshly constructed state.
    pub fn reset(&mut self) {
        self.zoom.reset();
        for c in self.cooldowns.iter_mut() {
            c.reset();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
