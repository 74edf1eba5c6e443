//! Session recording in the JSON-lines frame format, replayable with
//! `--source replay`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::wire::{encode_frame, LandmarkFrame};

pub struct Recorder<W: Write> {
    out:    W,
    frames: u64,
}

impl Recorder<Box<dyn Write>> {
    /// Buffered recording into a new file, truncating any existing one.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Recorder::new(Box::new(BufWriter::new(File::create(path)?))))
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(out: W) -> Self {
        Recorder { out, frames: 0 }
    }

    /// Append one frame stamped `t` seconds.
    pub fn record(&mut self, frame: &LandmarkFrame, t: f64) -> io::Result<()> {
        let line = encode_frame(frame, t)?;
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::decode_line;
    use hand_pose::synth;

    #[test]
    fn one_line_per_frame() {
        let mut rec = Recorder::new(Vec::new());
        rec.record(&LandmarkFrame::from_sample(Some(&synth::fist())), 0.0).unwrap();
        rec.record(&LandmarkFrame::empty(), 0.033).unwrap();
        assert_eq!(rec.frames(), 2);

        let text = String::from_utf8(rec.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(decode_line(lines[0], 0.7).unwrap().has_hand());
        assert_eq!(decode_line(lines[1], 0.7).unwrap().timestamp, Some(0.033));
    }
}
