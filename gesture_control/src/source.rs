//! Landmark sources: keyboard simulation, a JSON-lines stream, or LeapMotion
//! hardware.
//!
//! Every source runs on its own thread and delivers [`SourceEvent`]s over a
//! `mpsc` channel.  The frame loop does not care where frames come from.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use hand_pose::{synth, LandmarkSample};
use log::{debug, info, warn};

use crate::wire::{decode_line, LandmarkFrame};

// ════════════════════════════════════════════════════════════════════════════
// SourceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    Frame(LandmarkFrame),
    /// The user asked to stop, or the input ran out.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`SourceEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<SourceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: typed pose names, no camera
// ════════════════════════════════════════════════════════════════════════════

/// One line of simulator input.
#[derive(Clone, Debug, PartialEq)]
pub enum SimCommand {
    /// Hold this hand (or no hand) until the next command.
    Hold(Option<LandmarkSample>),
    Quit,
}

impl SimCommand {
    /// `open`, `fist`, `three`, `pinch [d]`, `two [gap]`, `point up|down`,
    /// `none`, `q`.  Unknown input yields `None`.
    pub fn parse(line: &str) -> Option<SimCommand> {
        let mut words = line.split_whitespace();
        let verb = words.next()?.to_ascii_lowercase();
        let arg = words.next();
        let number = |default: f32| arg.and_then(|a| a.parse::<f32>().ok()).unwrap_or(default);

        let hand = match verb.as_str() {
            "q" | "quit"  => return Some(SimCommand::Quit),
            "none" | "-"  => None,
            "open"        => Some(synth::open_hand()),
            "fist"        => Some(synth::fist()),
            "three"       => Some(synth::three_fingers()),
            "pinch"       => Some(synth::pinch(number(0.10))),
            "two"         => Some(synth::two_fingers(number(0.02))),
            "point"       => match arg {
                Some("down") => Some(synth::point_down()),
                Some("up") | None => Some(synth::point_up()),
                Some(_) => return None,
            },
            _ => return None,
        };
        Some(SimCommand::Hold(hand))
    }
}

/// Reads pose names line by line and repeats the current pose at a fixed
/// frame rate, so holding a pose behaves like holding a hand up to a camera.
pub struct SimLandmarkSource {
    input:          Box<dyn BufRead + Send>,
    frame_interval: Duration,
}

impl SimLandmarkSource {
    pub fn new(input: Box<dyn BufRead + Send>, frame_interval: Duration) -> Self {
        SimLandmarkSource { input, frame_interval }
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let SimLandmarkSource { input, frame_interval } = *self;

        // Line reading blocks, so it gets its own thread.
        let (cmd_tx, cmd_rx) = mpsc::channel::<SimCommand>();
        thread::spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match SimCommand::parse(&line) {
                    Some(cmd) => {
                        let quit = cmd == SimCommand::Quit;
                        if cmd_tx.send(cmd).is_err() || quit {
                            return;
                        }
                    }
                    None => warn!("unknown pose {:?}", line.trim()),
                }
            }
        });

        let mut current: Option<LandmarkSample> = None;
        loop {
            match cmd_rx.recv_timeout(frame_interval) {
                Ok(SimCommand::Hold(hand)) => {
                    debug!("sim: now holding {}", if hand.is_some() { "a hand" } else { "nothing" });
                    current = hand;
                }
                Ok(SimCommand::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    let _ = tx.send(SourceEvent::Quit);
                    return;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
            let frame = LandmarkFrame::from_sample(current.as_ref());
            if tx.send(SourceEvent::Frame(frame)).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesSource: MediaPipe bridge on stdin, or a recording
// ════════════════════════════════════════════════════════════════════════════

pub struct JsonLinesSource {
    input:          Box<dyn BufRead + Send>,
    min_confidence: f32,
}

impl JsonLinesSource {
    pub fn new(input: Box<dyn BufRead + Send>, min_confidence: f32) -> Self {
        JsonLinesSource { input, min_confidence }
    }
}

impl LandmarkSource for JsonLinesSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        let mut frames = 0u64;
        for (n, line) in self.input.lines().enumerate() {
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    warn!("input read failed at line {}: {}", n + 1, e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let frame = decode_line(&line, self.min_confidence).unwrap_or_else(|e| {
                warn!("line {}: {}; treating as no hand", n + 1, e);
                LandmarkFrame::empty()
            });
            frames += 1;
            if tx.send(SourceEvent::Frame(frame)).is_err() {
                return;
            }
        }
        info!("input exhausted after {} frames", frames);
        let _ = tx.send(SourceEvent::Quit);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Result of one poll of a tracking device.
#[derive(Clone, Debug, PartialEq)]
pub enum DevicePoll {
    /// A tracking frame, with the first hand's points if one was seen.
    Tracking(Option<Vec<hand_pose::LandmarkPoint>>),
    /// Some other device event.
    Other,
    /// Nothing arrived within the poll interval.
    Timeout,
}

/// Forward device polls as frames until the receiver hangs up.  A timeout
/// counts as a frame with no hand, so a silent device still notices a closed
/// channel.
pub fn pump_polls(mut poll: impl FnMut() -> DevicePoll, tx: &Sender<SourceEvent>) {
    loop {
        let points = match poll() {
            DevicePoll::Tracking(points) => points,
            DevicePoll::Timeout          => None,
            DevicePoll::Other            => continue,
        };
        if tx.send(SourceEvent::Frame(LandmarkFrame { points, timestamp: None })).is_err() {
            return;
        }
    }
}

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Each digit's joints are projected onto the device's x/y plane and
/// normalized so that the interaction box maps onto `[0, 1]²` with y down,
/// matching a mirrored camera frame.  Only the first tracked hand is used.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    /// Half-width of the tracked area, mm either side of the device.
    const HALF_WIDTH_MM: f32 = 200.0;
    /// Height of the tracked area above the device, mm.
    const HEIGHT_MM:     f32 = 400.0;

    fn project(x: f32, y: f32) -> hand_pose::LandmarkPoint {
        hand_pose::LandmarkPoint::new(0.5 + x / (2.0 * Self::HALF_WIDTH_MM), 1.0 - y / Self::HEIGHT_MM)
    }

    /// Palm centre stands in for the wrist; each digit contributes its four
    /// bone end points from knuckle to tip.
    fn landmarks(hand: &leaprs::Hand) -> Vec<hand_pose::LandmarkPoint> {
        let mut points = Vec::with_capacity(hand_pose::LANDMARK_COUNT);
        let palm = hand.palm().position();
        points.push(Self::project(palm.x, palm.y));
        for digit in hand.digits() {
            for joint in [
                digit.metacarpal().next_joint(),
                digit.proximal().next_joint(),
                digit.intermediate().next_joint(),
                digit.distal().next_joint(),
            ] {
                points.push(Self::project(joint.x, joint.y));
            }
        }
        points
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<SourceEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                log::error!("cannot create LeapC connection: {:?}", e);
                let _ = tx.send(SourceEvent::Quit);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("cannot open LeapMotion device: {:?}", e);
            let _ = tx.send(SourceEvent::Quit);
            return;
        }
        info!("LeapMotion connected");

        pump_polls(
            || match connection.poll(100) {
                Ok(msg) => match msg.event() {
                    Event::Tracking(frame) => DevicePoll::Tracking(frame.hands().next().map(|h| Self::landmarks(&h))),
                    _ => DevicePoll::Other,
                },
                Err(_) => DevicePoll::Timeout,
            },
            &tx,
        );
        info!("LeapMotion source stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
