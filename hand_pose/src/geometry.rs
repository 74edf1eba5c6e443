//! Pure geometry over landmark points.
//!
//! Nothing here can fail: every function is total over finite inputs, and
//! [`LandmarkSample`](crate::LandmarkSample) guarantees finiteness.

use crate::landmark::LandmarkPoint;

/// mcp→pip distance times this factor approximates a fully extended finger.
pub const FULL_LENGTH_FACTOR: f32 = 2.5;

/// A finger is folded when mcp→tip is below this fraction of its full length.
pub const FIST_THRESHOLD: f32 = 0.6;

/// Euclidean distance in normalized frame space.
pub fn distance(p1: LandmarkPoint, p2: LandmarkPoint) -> f32 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// A finger is raised when its tip sits higher on screen than the reference
/// joint (PIP or MCP).  Screen y grows downward.
pub fn is_extended(tip: LandmarkPoint, reference: LandmarkPoint) -> bool {
    tip.y < reference.y
}

/// The thumb extends sideways, so its raised test compares x instead of y.
pub fn is_thumb_extended(tip: LandmarkPoint, reference: LandmarkPoint) -> bool {
    tip.x < reference.x
}

/// Direction of the pip→tip vector in degrees, `[0, 360)`, clockwise from
/// screen-up: 0° points up, 90° right, 180° down, 270° left.
pub fn pointing_angle(tip: LandmarkPoint, pip: LandmarkPoint) -> f32 {
    let dx = tip.x - pip.x;
    let dy = tip.y - pip.y;
    let deg = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative angle up to exactly 360.0
    if deg >= 360.0 { 0.0 } else { deg }
}

// ════════════════════════════════════════════════════════════════════════════
// Curl
// ════════════════════════════════════════════════════════════════════════════

/// How far a finger reaches compared to how far it could reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurlRatio {
    /// mcp→tip distance.
    pub extended_length: f32,
    /// mcp→pip distance × [`FULL_LENGTH_FACTOR`].
    pub reference_length: f32,
}

impl CurlRatio {
    /// True when the finger is folded under `threshold` (normally
    /// [`FIST_THRESHOLD`]).
    pub fn is_folded(&self, threshold: f32) -> bool {
        self.extended_length < self.reference_length * threshold
    }

    /// True when the finger reaches further than `ratio` of its full length.
    pub fn is_straight(&self, ratio: f32) -> bool {
        self.extended_length > self.reference_length * ratio
    }

    /// extended / reference, 0 when the reference collapses to a point.
    pub fn ratio(&self) -> f32 {
        if self.reference_length > f32::EPSILON {
            self.extended_length / self.reference_length
        } else {
            0.0
        }
    }
}

pub fn finger_curl_ratio(mcp: LandmarkPoint, tip: LandmarkPoint, pip: LandmarkPoint) -> CurlRatio {
    CurlRatio {
        extended_length:  distance(mcp, tip),
        reference_length: distance(mcp, pip) * FULL_LENGTH_FACTOR,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f32, y: f32) -> LandmarkPoint { LandmarkPoint::new(x, y) }

    #[test]
    fn distance_is_euclidean() {
        assert_relative_eq!(distance(p(0.0, 0.0), p(0.3, 0.4)), 0.5, epsilon = 1e-6);
        assert_eq!(distance(p(0.2, 0.2), p(0.2, 0.2)), 0.0);
    }

    #[test]
    fn extended_means_tip_above_reference() {
        assert!(is_extended(p(0.5, 0.3), p(0.5, 0.4)));
        assert!(!is_extended(p(0.5, 0.5), p(0.5, 0.4)));
        // equal height is not raised
        assert!(!is_extended(p(0.5, 0.4), p(0.5, 0.4)));
    }

    #[test]
    fn thumb_uses_lateral_axis() {
        assert!(is_thumb_extended(p(0.30, 0.9), p(0.35, 0.1)));
        assert!(!is_thumb_extended(p(0.40, 0.1), p(0.35, 0.9)));
    }

    #[test]
    fn pointing_angle_cardinal_directions() {
        let pip = p(0.5, 0.5);
        assert_relative_eq!(pointing_angle(p(0.5, 0.4), pip), 0.0, epsilon = 1e-4);
        assert_relative_eq!(pointing_angle(p(0.6, 0.5), pip), 90.0, epsilon = 1e-4);
        assert_relative_eq!(pointing_angle(p(0.5, 0.6), pip), 180.0, epsilon = 1e-4);
        assert_relative_eq!(pointing_angle(p(0.4, 0.5), pip), 270.0, epsilon = 1e-4);
    }

    #[test]
    fn pointing_angle_stays_in_range() {
        let pip = p(0.5, 0.5);
        for i in 0..72 {
            let a = (i as f32 * 5.0).to_radians();
            let tip = p(0.5 + 0.1 * a.sin(), 0.5 - 0.1 * a.cos());
            let deg = pointing_angle(tip, pip);
            assert!((0.0..360.0).contains(&deg), "angle {} out of range", deg);
        }
        // slightly left of straight up wraps to just under 360
        assert!(pointing_angle(p(0.49, 0.3), pip) > 330.0);
    }

    #[test]
    fn curl_ratio_detects_folded_finger() {
        // pip 0.05 above mcp → full length 0.125; tip 0.02 away → folded
        let folded = finger_curl_ratio(p(0.5, 0.6), p(0.5, 0.62), p(0.5, 0.55));
        assert_relative_eq!(folded.reference_length, 0.125, epsilon = 1e-6);
        assert!(folded.is_folded(FIST_THRESHOLD));
        assert!(!folded.is_straight(0.7));

        let straight = finger_curl_ratio(p(0.5, 0.6), p(0.5, 0.4), p(0.5, 0.5));
        assert!(!straight.is_folded(FIST_THRESHOLD));
        assert!(straight.is_straight(0.7));
        assert_relative_eq!(straight.ratio(), 0.8, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_reference_has_zero_ratio() {
        let c = finger_curl_ratio(p(0.5, 0.5), p(0.5, 0.4), p(0.5, 0.5));
        assert_eq!(c.ratio(), 0.0);
    }
}
