//! # hand_pose
//!
//! The data side of hand tracking: one hand's 21 normalized landmark points
//! for one video frame, the fixed joint topology that names them, and the
//! pure geometry used to decide whether a finger is raised, folded or
//! pointing somewhere.
//!
//! ## Coordinate convention
//!
//! Points are normalized to the frame: `x` and `y` lie in `[0, 1]`, the
//! origin is the top-left corner and `y` grows downward.  Frames are mirrored
//! horizontally, so the picture behaves like a mirror for the user.
//!
//! ## Topology
//!
//! | Index | Joint |
//! |---|---|
//! | 0 | Wrist |
//! | 1–4 | Thumb CMC, MCP, IP, tip |
//! | 5–8 | Index MCP, PIP, DIP, tip |
//! | 9–12 | Middle MCP, PIP, DIP, tip |
//! | 13–16 | Ring MCP, PIP, DIP, tip |
//! | 17–20 | Pinky MCP, PIP, DIP, tip |

pub mod landmark;
pub mod geometry;
pub mod synth;

pub use landmark::{Finger, Joint, LandmarkError, LandmarkPoint, LandmarkSample, LANDMARK_COUNT};
pub use geometry::{
    distance, finger_curl_ratio, is_extended, is_thumb_extended, pointing_angle, CurlRatio,
    FIST_THRESHOLD, FULL_LENGTH_FACTOR,
};
