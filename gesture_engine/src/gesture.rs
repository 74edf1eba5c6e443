//! The closed vocabularies shared by every stage: gesture kinds, the poses
//! that produce them and the cooldown groups that rate-limit them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// GestureKind
// ════════════════════════════════════════════════════════════════════════════

/// A semantic gesture.  Everything but [`GestureKind::None`] maps to an OS
/// command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    Screenshot,
    None,
}

impl GestureKind {
    /// Every kind that produces an action, in display order.
    pub const ACTIONS: [GestureKind; 8] = [
        GestureKind::ZoomIn,
        GestureKind::ZoomOut,
        GestureKind::ResetZoom,
        GestureKind::ScrollUp,
        GestureKind::ScrollDown,
        GestureKind::ScrollLeft,
        GestureKind::ScrollRight,
        GestureKind::Screenshot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::ZoomIn      => "zoom-in",
            GestureKind::ZoomOut     => "zoom-out",
            GestureKind::ResetZoom   => "reset-zoom",
            GestureKind::ScrollUp    => "scroll-up",
            GestureKind::ScrollDown  => "scroll-down",
            GestureKind::ScrollLeft  => "scroll-left",
            GestureKind::ScrollRight => "scroll-right",
            GestureKind::Screenshot  => "screenshot",
            GestureKind::None        => "none",
        }
    }

    /// Upper-case text for a status line.
    pub fn label(self) -> &'static str {
        match self {
            GestureKind::ZoomIn      => "ZOOM IN",
            GestureKind::ZoomOut     => "ZOOM OUT",
            GestureKind::ResetZoom   => "RESET ZOOM",
            GestureKind::ScrollUp    => "SCROLL UP",
            GestureKind::ScrollDown  => "SCROLL DOWN",
            GestureKind::ScrollLeft  => "SCROLL LEFT",
            GestureKind::ScrollRight => "SCROLL RIGHT",
            GestureKind::Screenshot  => "SCREENSHOT",
            GestureKind::None        => "NONE",
        }
    }

    /// Continuous gestures keep firing while the pose is held; discrete ones
    /// are one-shot presses.  Both are bounded by their group's cooldown.
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            GestureKind::ZoomIn
                | GestureKind::ZoomOut
                | GestureKind::ScrollUp
                | GestureKind::ScrollDown
                | GestureKind::ScrollLeft
                | GestureKind::ScrollRight
        )
    }

    /// The cooldown timer this kind shares.  `None` has no timer.
    pub fn cooldown_group(self) -> Option<CooldownGroup> {
        match self {
            GestureKind::ZoomIn | GestureKind::ZoomOut         => Some(CooldownGroup::Zoom),
            GestureKind::ResetZoom                             => Some(CooldownGroup::Reset),
            GestureKind::Screenshot                            => Some(CooldownGroup::Screenshot),
            GestureKind::ScrollUp | GestureKind::ScrollDown    => Some(CooldownGroup::VerticalScroll),
            GestureKind::ScrollLeft | GestureKind::ScrollRight => Some(CooldownGroup::HorizontalScroll),
            GestureKind::None                                  => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == GestureKind::None
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CooldownGroup
// ════════════════════════════════════════════════════════════════════════════

/// Kinds in the same group share one cooldown timer, so flipping direction
/// (zoom in ↔ out, left ↔ right) never bypasses the rate limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CooldownGroup {
    Zoom,
    Reset,
    Screenshot,
    VerticalScroll,
    HorizontalScroll,
}

impl CooldownGroup {
    pub const ALL: [CooldownGroup; 5] = [
        CooldownGroup::Zoom,
        CooldownGroup::Reset,
        CooldownGroup::Screenshot,
        CooldownGroup::VerticalScroll,
        CooldownGroup::HorizontalScroll,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_continuous(self) -> bool {
        !matches!(self, CooldownGroup::Reset | CooldownGroup::Screenshot)
    }

    pub fn name(self) -> &'static str {
        match self {
            CooldownGroup::Zoom             => "zoom",
            CooldownGroup::Reset            => "reset",
            CooldownGroup::Screenshot       => "screenshot",
            CooldownGroup::VerticalScroll   => "vertical-scroll",
            CooldownGroup::HorizontalScroll => "horizontal-scroll",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pose
// ════════════════════════════════════════════════════════════════════════════

/// A finger configuration recognised by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    Fist,
    AllFingersUp,
    ThreeFingersUp,
    ThumbIndexUp,
    TwoFingersUp,
    OneFingerPointing,
}

impl Pose {
    /// Poses in precedence order, most specific first.
    pub const ALL: [Pose; 6] = [
        Pose::Fist,
        Pose::AllFingersUp,
        Pose::ThreeFingersUp,
        Pose::ThumbIndexUp,
        Pose::TwoFingersUp,
        Pose::OneFingerPointing,
    ];

    /// 1 is the highest precedence.
    pub fn precedence(self) -> u8 {
        match self {
            Pose::Fist              => 1,
            Pose::AllFingersUp      => 2,
            Pose::ThreeFingersUp    => 3,
            Pose::ThumbIndexUp      => 4,
            Pose::TwoFingersUp      => 5,
            Pose::OneFingerPointing => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pose::Fist              => "fist",
            Pose::AllFingersUp      => "all-fingers-up",
            Pose::ThreeFingersUp    => "three-fingers-up",
            Pose::ThumbIndexUp      => "thumb-index-up",
            Pose::TwoFingersUp      => "two-fingers-up",
            Pose::OneFingerPointing => "one-finger-pointing",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_a_group() {
        for kind in GestureKind::ACTIONS {
            assert!(kind.cooldown_group().is_some(), "{} has no cooldown group", kind);
        }
        assert_eq!(GestureKind::None.cooldown_group(), None);
    }

    #[test]
    fn directions_share_a_timer() {
        assert_eq!(GestureKind::ZoomIn.cooldown_group(), GestureKind::ZoomOut.cooldown_group());
        assert_eq!(
            GestureKind::ScrollLeft.cooldown_group(),
            GestureKind::ScrollRight.cooldown_group()
        );
        assert_ne!(
            GestureKind::ScrollUp.cooldown_group(),
            GestureKind::ScrollLeft.cooldown_group()
        );
    }

    #[test]
    fn continuity_agrees_with_group() {
        for kind in GestureKind::ACTIONS {
            let group = kind.cooldown_group().unwrap();
            assert_eq!(kind.is_continuous(), group.is_continuous(), "{}", kind);
        }
    }

    #[test]
    fn precedence_is_total_and_ordered() {
        let ranks: Vec<u8> = Pose::ALL.iter().map(|p| p.precedence()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn group_indices_are_dense() {
        for (i, g) in CooldownGroup::ALL.iter().enumerate() {
            assert_eq!(g.index(), i);
        }
    }
}
