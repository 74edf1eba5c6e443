//! Synthetic hands.
//!
//! Builds plausible 21-point samples for a mirrored right hand held up in
//! front of the camera.  Used by the keyboard simulator (no camera needed)
//! and by tests that need a specific finger configuration.
//!
//! Every finger starts folded; [`HandBuilder::extend`] raises one.

use crate::landmark::{Finger, Joint, LandmarkPoint, LandmarkSample, LANDMARK_COUNT};

// Column (x) of each non-thumb finger.
const INDEX_X:  f32 = 0.45;
const MIDDLE_X: f32 = 0.50;
const RING_X:   f32 = 0.55;
const PINKY_X:  f32 = 0.60;

const WRIST: LandmarkPoint = LandmarkPoint::new(0.52, 0.90);

// Heights of mcp, pip, dip, tip for a raised and a curled finger.
const RAISED: [f32; 4] = [0.65, 0.55, 0.50, 0.45];
const CURLED: [f32; 4] = [0.65, 0.60, 0.64, 0.67];

// Thumb cmc, mcp, ip, tip.
const THUMB_OUT: [(f32, f32); 4] = [(0.45, 0.80), (0.40, 0.75), (0.36, 0.70), (0.32, 0.66)];
const THUMB_IN:  [(f32, f32); 4] = [(0.45, 0.80), (0.43, 0.75), (0.42, 0.70), (0.46, 0.68)];

fn column(finger: Finger) -> f32 {
    match finger {
        Finger::Thumb  => THUMB_OUT[3].0,
        Finger::Index  => INDEX_X,
        Finger::Middle => MIDDLE_X,
        Finger::Ring   => RING_X,
        Finger::Pinky  => PINKY_X,
    }
}

fn joints(finger: Finger) -> [Joint; 4] {
    match finger {
        Finger::Thumb  => [Joint::ThumbCmc, Joint::ThumbMcp, Joint::ThumbIp, Joint::ThumbTip],
        Finger::Index  => [Joint::IndexMcp, Joint::IndexPip, Joint::IndexDip, Joint::IndexTip],
        Finger::Middle => [Joint::MiddleMcp, Joint::MiddlePip, Joint::MiddleDip, Joint::MiddleTip],
        Finger::Ring   => [Joint::RingMcp, Joint::RingPip, Joint::RingDip, Joint::RingTip],
        Finger::Pinky  => [Joint::PinkyMcp, Joint::PinkyPip, Joint::PinkyDip, Joint::PinkyTip],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandBuilder
// ════════════════════════════════════════════════════════════════════════════

/// Step-by-step construction of a synthetic hand.
#[derive(Clone, Debug)]
pub struct HandBuilder {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl Default for HandBuilder {
    fn default() -> Self { HandBuilder::new() }
}

impl HandBuilder {
    /// A closed fist.
    pub fn new() -> Self {
        let mut b = HandBuilder { points: [LandmarkPoint::default(); LANDMARK_COUNT] };
        b.set(Joint::Wrist, WRIST);
        for finger in Finger::ALL {
            b = b.fold(finger);
        }
        b
    }

    fn set(&mut self, joint: Joint, p: LandmarkPoint) {
        self.points[joint.index()] = p;
    }

    fn lay(&mut self, finger: Finger, heights: [f32; 4]) {
        let x = column(finger);
        for (joint, y) in joints(finger).into_iter().zip(heights) {
            self.set(joint, LandmarkPoint::new(x, y));
        }
    }

    fn lay_thumb(&mut self, coords: [(f32, f32); 4]) {
        for (joint, xy) in joints(Finger::Thumb).into_iter().zip(coords) {
            self.set(joint, xy.into());
        }
    }

    /// Raise a finger (the thumb swings out sideways).
    pub fn extend(mut self, finger: Finger) -> Self {
        match finger {
            Finger::Thumb => self.lay_thumb(THUMB_OUT),
            _             => self.lay(finger, RAISED),
        }
        self
    }

    /// Curl a finger into the palm.
    pub fn fold(mut self, finger: Finger) -> Self {
        match finger {
            Finger::Thumb => self.lay_thumb(THUMB_IN),
            _             => self.lay(finger, CURLED),
        }
        self
    }

    /// Straight index finger aimed at the floor.
    pub fn index_down(mut self) -> Self {
        let x = column(Finger::Index);
        for (joint, y) in joints(Finger::Index).into_iter().zip([0.40, 0.50, 0.55, 0.60]) {
            self.set(joint, LandmarkPoint::new(x, y));
        }
        self
    }

    /// Move only the fingertip horizontally.
    pub fn tip_x(mut self, finger: Finger, x: f32) -> Self {
        let tip = self.points[finger.tip().index()];
        self.set(finger.tip(), LandmarkPoint::new(x, tip.y));
        self
    }

    /// Raised thumb whose tip sits `distance` to the left of the index tip,
    /// at the same height.
    pub fn thumb_pinch(mut self, distance: f32) -> Self {
        let index_tip = self.points[Joint::IndexTip.index()];
        let tip = LandmarkPoint::new(index_tip.x - distance, index_tip.y);
        self.lay_thumb([
            (tip.x + 0.10, tip.y + 0.20),
            (tip.x + 0.06, tip.y + 0.10),
            (tip.x + 0.03, tip.y + 0.05),
            (tip.x, tip.y),
        ]);
        self
    }

    /// Translate the whole hand.
    pub fn shift(mut self, dx: f32, dy: f32) -> Self {
        for p in self.points.iter_mut() {
            p.x += dx;
            p.y += dy;
        }
        self
    }

    pub fn build(self) -> LandmarkSample {
        LandmarkSample::new(self.points)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stock poses
// ════════════════════════════════════════════════════════════════════════════

pub fn fist() -> LandmarkSample {
    HandBuilder::new().build()
}

pub fn open_hand() -> LandmarkSample {
    Finger::ALL.iter().fold(HandBuilder::new(), |b, &f| b.extend(f)).build()
}

pub fn three_fingers() -> LandmarkSample {
    HandBuilder::new()
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .extend(Finger::Ring)
        .build()
}

/// Thumb and index raised, tips `distance` apart.
pub fn pinch(distance: f32) -> LandmarkSample {
    HandBuilder::new().extend(Finger::Index).thumb_pinch(distance).build()
}

/// Index and middle raised, tips `gap` apart horizontally.
pub fn two_fingers(gap: f32) -> LandmarkSample {
    HandBuilder::new()
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .tip_x(Finger::Middle, INDEX_X + gap)
        .build()
}

pub fn point_up() -> LandmarkSample {
    HandBuilder::new().extend(Finger::Index).build()
}

pub fn point_down() -> LandmarkSample {
    HandBuilder::new().index_down().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{distance, FIST_THRESHOLD};
    use approx::assert_relative_eq;

    #[test]
    fn fist_has_every_finger_folded() {
        let s = fist();
        for f in Finger::FOUR {
            assert!(s.curl(f).is_folded(FIST_THRESHOLD), "{} not folded", f.name());
            assert!(!s.is_finger_extended(f));
        }
        assert!(!s.is_finger_extended(Finger::Thumb));
    }

    #[test]
    fn open_hand_has_every_finger_raised() {
        let s = open_hand();
        for f in Finger::ALL {
            assert!(s.is_finger_extended(f), "{} not raised", f.name());
        }
    }

    #[test]
    fn pinch_distance_is_exact() {
        let s = pinch(0.12);
        assert_relative_eq!(distance(s.tip(Finger::Thumb), s.tip(Finger::Index)), 0.12, epsilon = 1e-5);
        assert!(s.is_finger_extended(Finger::Thumb));
        assert!(s.is_finger_extended(Finger::Index));
    }

    #[test]
    fn point_down_is_straight_but_not_raised() {
        let s = point_down();
        assert!(s.curl(Finger::Index).is_straight(0.7));
        assert!(!s.is_finger_extended(Finger::Index));
    }

    #[test]
    fn shift_moves_every_point() {
        let a = point_up();
        let b = HandBuilder::new().extend(Finger::Index).shift(0.1, -0.1).build();
        for (p, q) in a.points().iter().zip(b.points()) {
            assert_relative_eq!(q.x - p.x, 0.1, epsilon = 1e-6);
            assert_relative_eq!(q.y - p.y, -0.1, epsilon = 1e-6);
        }
    }
}
