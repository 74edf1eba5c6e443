//! Pose predicates.
//!
//! [`GestureClassifier::classify`] runs every predicate independently and
//! reports all poses that hold; choosing between them is
//! [`resolve`](crate::priority::resolve)'s job.  Nothing here keeps state,
//! so zoom direction is left open: it depends on the tracked distance
//! history held by the debouncer.

use hand_pose::{distance, pointing_angle, Finger, LandmarkSample, FIST_THRESHOLD};

use crate::config::ClassifierConfig;
use crate::gesture::{GestureKind, Pose};

/// Pointing up: angle below this, or above `360 - this`.
pub const UP_WINDOW_DEG: f32 = 30.0;
/// Pointing down: strictly between these.
pub const DOWN_WINDOW_DEG: (f32, f32) = (150.0, 210.0);

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// One satisfied pose together with the measurements later stages need.
#[derive(Clone, Debug, PartialEq)]
pub enum Classification {
    Fist,
    AllFingersUp,
    ThreeFingersUp {
        /// x-gaps index↔middle and middle↔ring.
        gaps: [f32; 2],
    },
    ThumbIndexUp {
        /// Thumb tip to index tip.
        distance: f32,
    },
    TwoFingersUp {
        /// |index.tip.x − middle.tip.x|
        gap:       f32,
        /// ScrollLeft, ScrollRight, or None when the gap sits on the threshold.
        direction: GestureKind,
    },
    OneFingerPointing {
        angle:     f32,
        /// ScrollUp, ScrollDown, or None when pointing sideways.
        direction: GestureKind,
    },
}

impl Classification {
    pub fn pose(&self) -> Pose {
        match self {
            Classification::Fist                     => Pose::Fist,
            Classification::AllFingersUp             => Pose::AllFingersUp,
            Classification::ThreeFingersUp { .. }    => Pose::ThreeFingersUp,
            Classification::ThumbIndexUp { .. }      => Pose::ThumbIndexUp,
            Classification::TwoFingersUp { .. }      => Pose::TwoFingersUp,
            Classification::OneFingerPointing { .. } => Pose::OneFingerPointing,
        }
    }

    /// The gesture this pose asks for, before debouncing.  Zoom reports
    /// `None` because its direction comes from the distance history.
    pub fn kind(&self) -> GestureKind {
        match self {
            Classification::Fist                                 => GestureKind::None,
            Classification::AllFingersUp                         => GestureKind::ResetZoom,
            Classification::ThreeFingersUp { .. }                => GestureKind::Screenshot,
            Classification::ThumbIndexUp { .. }                  => GestureKind::None,
            Classification::TwoFingersUp { direction, .. }       => *direction,
            Classification::OneFingerPointing { direction, .. }  => *direction,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        GestureClassifier { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Every pose the sample satisfies, in precedence order.
    pub fn classify(&self, s: &LandmarkSample) -> Vec<Classification> {
        let mut out = Vec::new();
        if self.is_fist(s) {
            out.push(Classification::Fist);
        }
        if self.all_fingers_up(s) {
            out.push(Classification::AllFingersUp);
        }
        out.extend(self.three_fingers_up(s));
        out.extend(self.thumb_index_up(s));
        out.extend(self.two_fingers_up(s));
        out.extend(self.one_finger_pointing(s));
        out
    }

    /// Index, middle, ring and pinky all curled into the palm.
    pub fn is_fist(&self, s: &LandmarkSample) -> bool {
        Finger::FOUR.iter().all(|&f| s.curl(f).is_folded(FIST_THRESHOLD))
    }

    pub fn all_fingers_up(&self, s: &LandmarkSample) -> bool {
        Finger::ALL.iter().all(|&f| s.is_finger_extended(f))
    }

    pub fn three_fingers_up(&self, s: &LandmarkSample) -> Option<Classification> {
        let raised = raised_exactly(s, &[Finger::Index, Finger::Middle, Finger::Ring], &[Finger::Pinky]);
        if !raised {
            return None;
        }
        let gaps = [
            (s.tip(Finger::Index).x - s.tip(Finger::Middle).x).abs(),
            (s.tip(Finger::Middle).x - s.tip(Finger::Ring).x).abs(),
        ];
        if gaps.iter().all(|&g| g > self.config.finger_separation) {
            Some(Classification::ThreeFingersUp { gaps })
        } else {
            None
        }
    }

    pub fn thumb_index_up(&self, s: &LandmarkSample) -> Option<Classification> {
        let raised = raised_exactly(
            s,
            &[Finger::Thumb, Finger::Index],
            &[Finger::Middle, Finger::Ring, Finger::Pinky],
        );
        raised.then(|| Classification::ThumbIndexUp {
            distance: distance(s.tip(Finger::Thumb), s.tip(Finger::Index)),
        })
    }

    pub fn two_fingers_up(&self, s: &LandmarkSample) -> Option<Classification> {
        let raised = raised_exactly(
            s,
            &[Finger::Index, Finger::Middle],
            &[Finger::Thumb, Finger::Ring, Finger::Pinky],
        );
        if !raised {
            return None;
        }
        let gap = (s.tip(Finger::Index).x - s.tip(Finger::Middle).x).abs();
        let threshold = self.config.horizontal_gap;
        let direction = if gap < threshold {
            GestureKind::ScrollRight
        } else if gap > threshold {
            GestureKind::ScrollLeft
        } else {
            GestureKind::None
        };
        Some(Classification::TwoFingersUp { gap, direction })
    }

    /// Index straight and the other three folded.  Judged by curl rather than
    /// tip height so that pointing at the floor still counts.
    pub fn one_finger_pointing(&self, s: &LandmarkSample) -> Option<Classification> {
        let index = s.curl(Finger::Index);
        if !index.is_straight(self.config.pointing_straightness) || index.is_folded(FIST_THRESHOLD) {
            return None;
        }
        let others_folded = [Finger::Middle, Finger::Ring, Finger::Pinky]
            .iter()
            .all(|&f| s.curl(f).is_folded(FIST_THRESHOLD));
        if !others_folded {
            return None;
        }
        let angle = pointing_angle(s.tip(Finger::Index), s.point(Finger::Index.pip()));
        Some(Classification::OneFingerPointing { angle, direction: pointing_direction(angle) })
    }
}

/// ScrollUp, ScrollDown or None for a pointing angle.
pub fn pointing_direction(angle: f32) -> GestureKind {
    if angle < UP_WINDOW_DEG || angle > 360.0 - UP_WINDOW_DEG {
        GestureKind::ScrollUp
    } else if angle > DOWN_WINDOW_DEG.0 && angle < DOWN_WINDOW_DEG.1 {
        GestureKind::ScrollDown
    } else {
        GestureKind::None
    }
}

fn raised_exactly(s: &LandmarkSample, up: &[Finger], down: &[Finger]) -> bool {
    up.iter().all(|&f| s.is_finger_extended(f)) && down.iter().all(|&f| !s.is_finger_extended(f))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hand_pose::synth::{self, HandBuilder};

    fn poses(s: &LandmarkSample) -> Vec<Pose> {
        GestureClassifier::default().classify(s).iter().map(|c| c.pose()).collect()
    }

    #[test]
    fn fist_is_recognised() {
        assert_eq!(poses(&synth::fist()), vec![Pose::Fist]);
    }

    #[test]
    fn open_hand_is_all_fingers_up() {
        let got = poses(&synth::open_hand());
        assert!(got.contains(&Pose::AllFingersUp));
        assert!(!got.contains(&Pose::Fist));
    }

    #[test]
    fn three_fingers_need_separation() {
        assert!(poses(&synth::three_fingers()).contains(&Pose::ThreeFingersUp));

        // middle and ring tips bunched together
        let bunched = HandBuilder::new()
            .extend(Finger::Index)
            .extend(Finger::Middle)
            .extend(Finger::Ring)
            .tip_x(Finger::Ring, 0.51)
            .build();
        assert!(!poses(&bunched).contains(&Pose::ThreeFingersUp));
    }

    #[test]
    fn three_fingers_reject_raised_pinky() {
        let four = HandBuilder::new()
            .extend(Finger::Index)
            .extend(Finger::Middle)
            .extend(Finger::Ring)
            .extend(Finger::Pinky)
            .build();
        assert!(!poses(&four).contains(&Pose::ThreeFingersUp));
    }

    #[test]
    fn pinch_reports_distance() {
        let all = GestureClassifier::default().classify(&synth::pinch(0.12));
        let zoom = all.iter().find(|c| c.pose() == Pose::ThumbIndexUp).unwrap();
        match zoom {
            Classification::ThumbIndexUp { distance } => assert_relative_eq!(*distance, 0.12, epsilon = 1e-5),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(zoom.kind(), GestureKind::None);
    }

    #[test]
    fn two_finger_gap_picks_direction() {
        let c = GestureClassifier::default();
        let close = c.two_fingers_up(&synth::two_fingers(0.02)).unwrap();
        let wide = c.two_fingers_up(&synth::two_fingers(0.08)).unwrap();
        assert_eq!(close.kind(), GestureKind::ScrollRight);
        assert_eq!(wide.kind(), GestureKind::ScrollLeft);
    }

    #[test]
    fn two_fingers_reject_raised_thumb() {
        let s = HandBuilder::new()
            .extend(Finger::Thumb)
            .extend(Finger::Index)
            .extend(Finger::Middle)
            .build();
        assert_eq!(GestureClassifier::default().two_fingers_up(&s), None);
    }

    #[test]
    fn pointing_up_and_down() {
        let c = GestureClassifier::default();
        let up = c.one_finger_pointing(&synth::point_up()).unwrap();
        let down = c.one_finger_pointing(&synth::point_down()).unwrap();
        assert_eq!(up.kind(), GestureKind::ScrollUp);
        assert_eq!(down.kind(), GestureKind::ScrollDown);
    }

    #[test]
    fn pointing_needs_others_folded() {
        // index and middle raised: straight index, but middle is not folded
        let s = synth::two_fingers(0.05);
        assert_eq!(GestureClassifier::default().one_finger_pointing(&s), None);
    }

    #[test]
    fn pointing_windows() {
        assert_eq!(pointing_direction(0.0), GestureKind::ScrollUp);
        assert_eq!(pointing_direction(29.9), GestureKind::ScrollUp);
        assert_eq!(pointing_direction(345.0), GestureKind::ScrollUp);
        assert_eq!(pointing_direction(30.0), GestureKind::None);
        assert_eq!(pointing_direction(90.0), GestureKind::None);
        assert_eq!(pointing_direction(150.0), GestureKind::None);
        assert_eq!(pointing_direction(180.0), GestureKind::ScrollDown);
        assert_eq!(pointing_direction(210.0), GestureKind::None);
    }

    #[test]
    fn sideways_point_holds_pose_without_direction() {
        // index laid flat, tip to the right of the pip
        let mut points = *synth::point_up().points();
        let mcp = points[Finger::Index.mcp().index()];
        for (i, joint) in [Finger::Index.pip(), hand_pose::Joint::IndexDip, Finger::Index.tip()]
            .iter()
            .enumerate()
        {
            points[joint.index()] = hand_pose::LandmarkPoint::new(mcp.x + 0.1 * (i + 1) as f32 * 0.7, mcp.y);
        }
        let s = LandmarkSample::new(points);
        let c = GestureClassifier::default().one_finger_pointing(&s).unwrap();
        assert_eq!(c.kind(), GestureKind::None);
    }

    #[test]
    fn classify_is_pure() {
        let c = GestureClassifier::default();
        let s = synth::pinch(0.2);
        assert_eq!(c.classify(&s), c.classify(&s));
    }
}
