//! JSON-lines frame format shared by the MediaPipe bridge and recordings.
//!
//! One object per line:
//!
//! ```json
//! {"t": 12.5, "hands": [{"handedness": "Right", "score": 0.93,
//!   "landmarks": [{"x": 0.51, "y": 0.88, "z": 0.0}, ...]}]}
//! ```
//!
//! `t` (seconds) is optional and only written by the recorder.  A bridge that
//! hits an error reports `{"hands": [], "error": "..."}`.

use hand_pose::{LandmarkPoint, LandmarkSample};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireHand {
    #[serde(default)]
    pub handedness: String,
    #[serde(default = "full_score")]
    pub score:      f32,
    pub landmarks:  Vec<WirePoint>,
}

fn full_score() -> f32 { 1.0 }

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t:     Option<f64>,
    #[serde(default)]
    pub hands: Vec<WireHand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// One video frame as seen by the controller: at most one hand's raw points.
///
/// Points are kept unvalidated so that a short or corrupt list reaches the
/// engine, which treats it as a missing hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub points:    Option<Vec<LandmarkPoint>>,
    /// Seconds on the recording's own clock, when it has one.
    pub timestamp: Option<f64>,
}

impl LandmarkFrame {
    pub fn empty() -> Self {
        LandmarkFrame::default()
    }

    pub fn from_sample(sample: Option<&LandmarkSample>) -> Self {
        LandmarkFrame { points: sample.map(|s| s.points().to_vec()), timestamp: None }
    }

    pub fn has_hand(&self) -> bool {
        self.points.is_some()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// decode / encode
// ════════════════════════════════════════════════════════════════════════════

/// Parse one line.  Hands scoring under `min_confidence` are dropped and only
/// the first remaining hand is kept.
pub fn decode_line(line: &str, min_confidence: f32) -> Result<LandmarkFrame, serde_json::Error> {
    let wire: WireFrame = serde_json::from_str(line)?;
    if let Some(err) = &wire.error {
        warn!("hand tracker reported: {}", err);
    }
    let points = wire
        .hands
        .into_iter()
        .find(|h| h.score >= min_confidence)
        .map(|h| h.landmarks.iter().map(|p| LandmarkPoint::new(p.x, p.y)).collect());
    Ok(LandmarkFrame { points, timestamp: wire.t })
}

/// Serialise a frame as a single JSON line (no trailing newline).
pub fn encode_frame(frame: &LandmarkFrame, t: f64) -> Result<String, serde_json::Error> {
    let hands = frame
        .points
        .iter()
        .map(|pts| WireHand {
            handedness: "Right".into(),
            score:      1.0,
            landmarks:  pts.iter().map(|p| WirePoint { x: p.x, y: p.y, z: 0.0 }).collect(),
        })
        .collect();
    serde_json::to_string(&WireFrame { t: Some(t), hands, error: None })
}
