use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::WriteError;
use crate::guide::Timecode;

/// One timeline marker: where the beat lands and which beat it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideEntry {
    /// Beat position plus the run's offset
    pub timestamp: Timecode,

    /// 0-based position of the beat in the track
    pub index: usize,
}

impl GuideEntry {
    /// Build one entry per beat, preserving the beats' order
    pub fn from_beats(beat_times: &[f64], offset: Timecode) -> Vec<GuideEntry> {
        beat_times
            .iter()
            .enumerate()
            .map(|(index, &seconds)| GuideEntry {
                timestamp: Timecode::from_seconds(seconds) + offset,
                index,
            })
            .collect()
    }
}

impl fmt::Display for GuideEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.timestamp, self.index)
    }
}

/// Persists guide entries, one line each
pub struct GuideWriter;

impl GuideWriter {
    /// Create (or truncate) `path` and write every entry to it in order
    pub fn write<P: AsRef<Path>>(path: P, entries: &[GuideEntry]) -> Result<(), WriteError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| WriteError::new(path, e))?;

        Self::write_to(BufWriter::new(file), entries).map_err(|e| WriteError::new(path, e))?;

        tracing::debug!("Wrote {} guides to {}", entries.len(), path.display());
        Ok(())
    }

    /// Write entries as `<timestamp> <index>\n` lines
    pub fn write_to<W: Write>(mut out: W, entries: &[GuideEntry]) -> io::Result<()> {
        for entry in entries {
            writeln!(out, "{}", entry)?;
        }
        out.flush()
    }
}
