//! Landmark points, the 21-joint hand topology and the validated sample type.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one hand sample.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkPoint
// ════════════════════════════════════════════════════════════════════════════

/// One tracked joint position, frame-normalized (`[0, 1]`, origin top-left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        LandmarkPoint { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for LandmarkPoint {
    fn from((x, y): (f32, f32)) -> Self {
        LandmarkPoint { x, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Joint / Finger: the fixed topology
// ════════════════════════════════════════════════════════════════════════════

/// The 21 landmark positions, in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Joint {
    Wrist     = 0,
    ThumbCmc  = 1,
    ThumbMcp  = 2,
    ThumbIp   = 3,
    ThumbTip  = 4,
    IndexMcp  = 5,
    IndexPip  = 6,
    IndexDip  = 7,
    IndexTip  = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp   = 13,
    RingPip   = 14,
    RingDip   = 15,
    RingTip   = 16,
    PinkyMcp  = 17,
    PinkyPip  = 18,
    PinkyDip  = 19,
    PinkyTip  = 20,
}

impl Joint {
    pub const ALL: [Joint; LANDMARK_COUNT] = [
        Joint::Wrist,
        Joint::ThumbCmc, Joint::ThumbMcp, Joint::ThumbIp, Joint::ThumbTip,
        Joint::IndexMcp, Joint::IndexPip, Joint::IndexDip, Joint::IndexTip,
        Joint::MiddleMcp, Joint::MiddlePip, Joint::MiddleDip, Joint::MiddleTip,
        Joint::RingMcp, Joint::RingPip, Joint::RingDip, Joint::RingTip,
        Joint::PinkyMcp, Joint::PinkyPip, Joint::PinkyDip, Joint::PinkyTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five digits.  `mcp → pip → dip → tip` runs from the palm outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] =
        [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// The four non-thumb fingers, the ones that curl into a fist.
    pub const FOUR: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Knuckle joint.  For the thumb this is the thumb MCP, not the CMC.
    pub fn mcp(self) -> Joint {
        match self {
            Finger::Thumb  => Joint::ThumbMcp,
            Finger::Index  => Joint::IndexMcp,
            Finger::Middle => Joint::MiddleMcp,
            Finger::Ring   => Joint::RingMcp,
            Finger::Pinky  => Joint::PinkyMcp,
        }
    }

    /// Mid joint.  The thumb has no PIP; its IP joint plays that role.
    pub fn pip(self) -> Joint {
        match self {
            Finger::Thumb  => Joint::ThumbIp,
            Finger::Index  => Joint::IndexPip,
            Finger::Middle => Joint::MiddlePip,
            Finger::Ring   => Joint::RingPip,
            Finger::Pinky  => Joint::PinkyPip,
        }
    }

    pub fn tip(self) -> Joint {
        match self {
            Finger::Thumb  => Joint::ThumbTip,
            Finger::Index  => Joint::IndexTip,
            Finger::Middle => Joint::MiddleTip,
            Finger::Ring   => Joint::RingTip,
            Finger::Pinky  => Joint::PinkyTip,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb  => "thumb",
            Finger::Index  => "index",
            Finger::Middle => "middle",
            Finger::Ring   => "ring",
            Finger::Pinky  => "pinky",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSample
// ════════════════════════════════════════════════════════════════════════════

/// Why a raw point list could not become a [`LandmarkSample`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {found}")]
    WrongCount { found: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One hand's 21 landmarks for one frame.
///
/// The length is fixed by the type and indices are addressed through
/// [`Joint`], so a sample can never be reordered or truncated once built.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSample {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl LandmarkSample {
    pub fn new(points: [LandmarkPoint; LANDMARK_COUNT]) -> Self {
        LandmarkSample { points }
    }

    pub fn point(&self, joint: Joint) -> LandmarkPoint {
        self.points[joint.index()]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }

    pub fn tip(&self, finger: Finger) -> LandmarkPoint {
        self.point(finger.tip())
    }

    /// Raised test for one finger, using the lateral test for the thumb.
    pub fn is_finger_extended(&self, finger: Finger) -> bool {
        let tip = self.point(finger.tip());
        let reference = self.point(finger.pip());
        match finger {
            Finger::Thumb => crate::geometry::is_thumb_extended(tip, reference),
            _             => crate::geometry::is_extended(tip, reference),
        }
    }

    /// Curl measurement for one finger (mcp→tip against 2.5 × mcp→pip).
    pub fn curl(&self, finger: Finger) -> crate::geometry::CurlRatio {
        crate::geometry::finger_curl_ratio(
            self.point(finger.mcp()),
            self.point(finger.tip()),
            self.point(finger.pip()),
        )
    }
}

impl Index<Joint> for LandmarkSample {
    type Output = LandmarkPoint;

    fn index(&self, joint: Joint) -> &LandmarkPoint {
        &self.points[joint.index()]
    }
}

impl TryFrom<&[LandmarkPoint]> for LandmarkSample {
    type Error = LandmarkError;

    fn try_from(raw: &[LandmarkPoint]) -> Result<Self, Self::Error> {
        let points: [LandmarkPoint; LANDMARK_COUNT] = raw
            .try_into()
            .map_err(|_| LandmarkError::WrongCount { found: raw.len() })?;
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(LandmarkSample { points })
    }
}

impl TryFrom<Vec<LandmarkPoint>> for LandmarkSample {
    type Error = LandmarkError;

    fn try_from(raw: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        LandmarkSample::try_from(raw.as_slice())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(n: usize) -> Vec<LandmarkPoint> {
        (0..n).map(|i| LandmarkPoint::new(i as f32 / 100.0, 0.5)).collect()
    }

    #[test]
    fn joint_indices_follow_topology() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
        }
        assert_eq!(Finger::Index.tip().index(), 8);
        assert_eq!(Finger::Pinky.mcp().index(), 17);
        assert_eq!(Finger::Thumb.pip(), Joint::ThumbIp);
    }

    #[test]
    fn try_from_accepts_exactly_21() {
        let sample = LandmarkSample::try_from(raw(21)).unwrap();
        assert_eq!(sample[Joint::IndexTip], LandmarkPoint::new(0.08, 0.5));
        assert_eq!(sample.point(Joint::Wrist), LandmarkPoint::new(0.0, 0.5));
    }

    #[test]
    fn try_from_rejects_short_and_long() {
        assert_eq!(
            LandmarkSample::try_from(raw(20)),
            Err(LandmarkError::WrongCount { found: 20 })
        );
        assert_eq!(
            LandmarkSample::try_from(raw(22)),
            Err(LandmarkError::WrongCount { found: 22 })
        );
        assert_eq!(
            LandmarkSample::try_from(Vec::<LandmarkPoint>::new()),
            Err(LandmarkError::WrongCount { found: 0 })
        );
    }

    #[test]
    fn try_from_rejects_nan() {
        let mut points = raw(21);
        points[7].y = f32::NAN;
        assert_eq!(
            LandmarkSample::try_from(points),
            Err(LandmarkError::NonFinite { index: 7 })
        );
    }

    #[test]
    fn error_message_names_count() {
        let err = LandmarkError::WrongCount { found: 3 };
        assert_eq!(err.to_string(), "expected 21 landmarks, got 3");
    }
}
