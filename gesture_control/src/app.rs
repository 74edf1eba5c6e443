//! The frame loop.
//!
//! [`Session`] owns the engine and the optional recorder and turns each
//! [`LandmarkFrame`] into one engine step.  [`run`] wires a source, the sinks
//! and a session together and drives them until the source quits.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use gesture_engine::{EngineConfig, FrameStatus, GestureEngine, GestureKind};
use log::{info, warn};

use crate::recorder::Recorder;
use crate::sinks::open_sinks;
use crate::source::{spawn_landmark_source, JsonLinesSource, SimLandmarkSource, SourceEvent};
use crate::wire::LandmarkFrame;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Pose names typed on stdin.
    Sim,
    /// MediaPipe JSON lines on stdin.
    Stdin,
    /// A recorded JSON-lines file (`--input`).
    Replay,
    /// LeapMotion hardware (needs the `leap` feature).
    Leap,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub engine:         EngineConfig,
    pub source:         SourceKind,
    pub input:          Option<PathBuf>,
    /// Write every received frame here as JSON lines.
    pub record:         Option<PathBuf>,
    /// Inject real input instead of logging it.
    pub desktop:        bool,
    /// Simulator frame rate.
    pub fps:            f64,
    /// Bridge hands scoring below this are ignored.
    pub min_confidence: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            engine:         EngineConfig::default(),
            source:         SourceKind::Sim,
            input:          None,
            record:         None,
            desktop:        false,
            fps:            30.0,
            min_confidence: 0.7,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameClock
// ════════════════════════════════════════════════════════════════════════════

/// Maps frames onto the engine's monotonic time line.
///
/// The first frame fixes the mode for the whole stream.  If it carries a
/// recorded timestamp, every frame is placed relative to that first stamp,
/// so a replay reproduces the original timing however fast it is read; an
/// unstamped frame in such a stream repeats the previous instant.  If the
/// first frame has no stamp, the clock is live: each frame gets the current
/// instant and any later stamps are ignored.  Either way time never runs
/// backwards.
#[derive(Clone, Debug)]
pub struct FrameClock {
    origin:      Instant,
    first_stamp: Option<f64>,
    live:        Option<bool>,
    last:        Instant,
}

impl FrameClock {
    pub fn new(origin: Instant) -> Self {
        FrameClock { origin, first_stamp: None, live: None, last: origin }
    }

    pub fn instant(&mut self, stamp: Option<f64>) -> Instant {
        let stamp = stamp.filter(|t| t.is_finite());
        let live = *self.live.get_or_insert(stamp.is_none());

        let at = if live {
            Instant::now()
        } else {
            match stamp {
                Some(t) => {
                    let first = *self.first_stamp.get_or_insert(t);
                    let offset = Duration::try_from_secs_f64((t - first).max(0.0)).unwrap_or(Duration::ZERO);
                    self.origin.checked_add(offset).unwrap_or(self.last)
                }
                None => self.last,
            }
        };
        self.last = self.last.max(at);
        self.last
    }

    /// Seconds from the origin, for recording.
    pub fn seconds(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.origin).as_secs_f64()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session {
    engine:   GestureEngine,
    clock:    FrameClock,
    recorder: Option<Recorder<Box<dyn Write>>>,
    frames:   u64,
}

impl Session {
    pub fn new(engine: GestureEngine, recorder: Option<Recorder<Box<dyn Write>>>) -> Self {
        Session {
            engine,
            clock: FrameClock::new(Instant::now()),
            recorder,
            frames: 0,
        }
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    /// Run one frame through the engine.
    pub fn handle(&mut self, frame: &LandmarkFrame) -> FrameStatus {
        let now = self.clock.instant(frame.timestamp);
        self.frames += 1;

        if let Some(rec) = self.recorder.as_mut() {
            let t = frame.timestamp.unwrap_or_else(|| self.clock.seconds(now));
            if let Err(e) = rec.record(frame, t) {
                warn!("recording stopped: {}", e);
                self.recorder = None;
            }
        }

        self.engine.process_points(frame.points.as_deref(), now)
    }

    pub fn summary(&self) -> SessionSummary {
        let counter = self.engine.counter();
        SessionSummary {
            frames:  self.frames,
            actions: counter.iter().filter(|(_, n)| *n > 0).collect(),
            total:   counter.total(),
        }
    }

    /// Flush the recording, if any.
    pub fn finish(&mut self) -> io::Result<()> {
        match self.recorder.as_mut() {
            Some(rec) => {
                rec.flush()?;
                info!("recorded {} frames", rec.frames());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// What happened during a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub frames:  u64,
    /// Kinds that fired at least once, with their counts.
    pub actions: Vec<(GestureKind, u64)>,
    pub total:   u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} frames, {} actions", self.frames, self.total)?;
        for (kind, n) in &self.actions {
            writeln!(f, "  {:<14} {:>5}", kind.label(), n)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(cfg: &AppConfig) -> Result<Receiver<SourceEvent>> {
    let rx = match cfg.source {
        SourceKind::Sim => {
            let interval = Duration::try_from_secs_f64(1.0 / cfg.fps.max(1.0))
                .context("invalid frame rate")?;
            spawn_landmark_source(SimLandmarkSource::new(Box::new(BufReader::new(io::stdin())), interval))
        }
        SourceKind::Stdin => spawn_landmark_source(JsonLinesSource::new(
            Box::new(BufReader::new(io::stdin())),
            cfg.min_confidence,
        )),
        SourceKind::Replay => {
            let Some(path) = cfg.input.as_ref() else {
                bail!("--source replay needs --input <file>");
            };
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            spawn_landmark_source(JsonLinesSource::new(Box::new(BufReader::new(file)), cfg.min_confidence))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => spawn_landmark_source(crate::source::LeapLandmarkSource),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => bail!("built without the `leap` feature"),
    };
    Ok(rx)
}

/// Run the full application until the source quits or disconnects.
pub fn run(cfg: AppConfig) -> Result<SessionSummary> {
    let recorder = match cfg.record.as_ref() {
        Some(path) => {
            let rec = Recorder::create(path).with_context(|| format!("creating {}", path.display()))?;
            info!("recording to {}", path.display());
            Some(rec)
        }
        None => None,
    };

    let (commands, screenshots) = open_sinks(cfg.desktop);
    let rx = open_source(&cfg)?;
    let mut session = Session::new(GestureEngine::new(cfg.engine, commands, screenshots), recorder);

    // recv() blocks until the next frame; the loop ends on Quit or when the
    // source thread hangs up.
    while let Ok(event) = rx.recv() {
        match event {
            SourceEvent::Quit         => break,
            SourceEvent::Frame(frame) => {
                session.handle(&frame);
            }
        }
    }

    session.finish().context("flushing recording")?;
    let summary = session.summary();
    info!("session over: {} frames, {} actions", summary.frames, summary.total);
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
