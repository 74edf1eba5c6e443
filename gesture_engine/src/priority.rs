//! Picks one pose per frame.
//!
//! | Rank | Pose | Outcome |
//! |---|---|---|
//! | 1 | Fist | `Stop` |
//! | 2 | AllFingersUp | ResetZoom |
//! | 3 | ThreeFingersUp | Screenshot |
//! | 4 | ThumbIndexUp | zoom tracking |
//! | 5 | TwoFingersUp | horizontal scroll |
//! | 6 | OneFingerPointing | vertical scroll |
//! | 7 | nothing | `Idle` |

use crate::classifier::Classification;
use crate::gesture::{GestureKind, Pose};

/// The single winner of a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// No pose holds.
    Idle,
    /// A fist: suppress everything this frame.
    Stop,
    Pose(Classification),
}

impl Resolution {
    pub fn kind(&self) -> GestureKind {
        match self {
            Resolution::Pose(c) => c.kind(),
            _                   => GestureKind::None,
        }
    }

    pub fn pose(&self) -> Option<Pose> {
        match self {
            Resolution::Idle    => None,
            Resolution::Stop    => Some(Pose::Fist),
            Resolution::Pose(c) => Some(c.pose()),
        }
    }

    /// Thumb–index distance when the zoom pose won.
    pub fn zoom_distance(&self) -> Option<f32> {
        match self {
            Resolution::Pose(Classification::ThumbIndexUp { distance }) => Some(*distance),
            _ => None,
        }
    }
}

/// Highest-precedence candidate wins; the rest are discarded.
pub fn resolve(candidates: &[Classification]) -> Resolution {
    match candidates.iter().min_by_key(|c| c.pose().precedence()) {
        None                          => Resolution::Idle,
        Some(Classification::Fist)    => Resolution::Stop,
        Some(winner)                  => Resolution::Pose(winner.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointing_up() -> Classification {
        Classification::OneFingerPointing { angle: 0.0, direction: GestureKind::ScrollUp }
    }

    #[test]
    fn empty_is_idle() {
        assert_eq!(resolve(&[]), Resolution::Idle);
        assert_eq!(resolve(&[]).kind(), GestureKind::None);
    }

    #[test]
    fn fist_dominates_everything() {
        let all = vec![
            pointing_up(),
            Classification::AllFingersUp,
            Classification::ThumbIndexUp { distance: 0.1 },
            Classification::Fist,
        ];
        assert_eq!(resolve(&all), Resolution::Stop);
        assert_eq!(resolve(&all).kind(), GestureKind::None);
    }

    #[test]
    fn reset_beats_lower_poses() {
        let r = resolve(&[pointing_up(), Classification::AllFingersUp]);
        assert_eq!(r.kind(), GestureKind::ResetZoom);
    }

    #[test]
    fn zoom_beats_pointing() {
        let r = resolve(&[pointing_up(), Classification::ThumbIndexUp { distance: 0.2 }]);
        assert_eq!(r.pose(), Some(Pose::ThumbIndexUp));
        assert_eq!(r.zoom_distance(), Some(0.2));
        assert_eq!(r.kind(), GestureKind::None);
    }

    #[test]
    fn directionless_winner_still_discards_lower() {
        let sideways = Classification::TwoFingersUp { gap: 0.05, direction: GestureKind::None };
        let r = resolve(&[pointing_up(), sideways]);
        assert_eq!(r.pose(), Some(Pose::TwoFingersUp));
        assert_eq!(r.kind(), GestureKind::None);
    }

    #[test]
    fn order_of_candidates_does_not_matter() {
        let a = [Classification::ThreeFingersUp { gaps: [0.05, 0.05] }, pointing_up()];
        let b = [pointing_up(), Classification::ThreeFingersUp { gaps: [0.05, 0.05] }];
        assert_eq!(resolve(&a), resolve(&b));
    }
}
