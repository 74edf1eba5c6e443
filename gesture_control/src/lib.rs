//! # gesture_control
//!
//! Desktop control by hand gesture.  Landmark frames come from a source
//! thread, run through [`gesture_engine`], and the approved commands go to an
//! input-injection backend.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Fist | Stop: nothing fires while the fist is held |
//! | Open hand (all five fingers) | Reset zoom (Ctrl+0) |
//! | Index + middle + ring, spread | Screenshot |
//! | Thumb + index, widening / narrowing | Zoom in / out (Ctrl+"+" / Ctrl+"-") |
//! | Index + middle, tips apart / together | Left / right arrow |
//! | Index pointing up / down | Scroll up / down |
//!
//! ## Sources
//!
//! * `sim` (default): type pose names on stdin; the pose repeats at the
//!   frame rate until the next line.
//! * `stdin`: JSON lines from a MediaPipe bridge (see [`wire`]).
//! * `replay`: a file written by `--record`, replayed on its own timestamps.
//! * `leap`: LeapMotion hardware (feature `leap`).
//!
//! ### Simulation commands
//!
//! | Line | Hand |
//! |---|---|
//! | `open` | all five fingers up |
//! | `fist` | closed fist |
//! | `three` | index, middle and ring up |
//! | `pinch 0.15` | thumb and index up, tips 0.15 apart |
//! | `two 0.02` | index and middle up, tips 0.02 apart |
//! | `point up` / `point down` | index pointing |
//! | `none` | hand out of view |
//! | `q` | quit |
//!
//! ## Feature flags
//!
//! * (default): dry run, commands are only logged.
//! * `desktop`: real key and scroll injection (enigo) and screen capture (xcap).
//! * `leap`: LeapMotion source via LeapC.

pub mod wire;
pub mod source;
pub mod sinks;
pub mod recorder;
pub mod app;
