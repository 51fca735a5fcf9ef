use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::audio::{AudioLoader, BeatTracker};
use crate::config::AnalysisParameters;
use crate::error::{BeatfinderError, Result};
use crate::guide::{GuideEntry, GuideWriter};
use crate::pipeline::report::Reporter;

/// Suffix appended to derive guide file names
pub const GUIDE_SUFFIX: &str = "_beats.txt";

/// What a finished guide file looks like
#[derive(Debug, Clone, PartialEq)]
pub struct GuideSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tempo: f64,
    pub beats: usize,
}

/// Result of processing one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// The guide file was written
    Written(GuideSummary),

    /// Something went wrong with this file; nothing above it is affected
    Failed { input: PathBuf, error: BeatfinderError },
}

impl FileOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    /// Log a failure at error level; successes were already reported
    pub fn log(&self) {
        if let Self::Failed { input, error } = self {
            tracing::error!("Error processing file {}: {}", input.display(), error);
        }
    }
}

/// `<input>_beats.txt`, next to the input as it was given
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(GUIDE_SUFFIX);
    PathBuf::from(name)
}

/// Runs decode → track → write for one file at a time
pub struct FileProcessor<'a> {
    tracker: &'a dyn BeatTracker,
    params: &'a AnalysisParameters,
    reporter: &'a dyn Reporter,
}

impl<'a> FileProcessor<'a> {
    pub fn new(
        tracker: &'a dyn BeatTracker,
        params: &'a AnalysisParameters,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            tracker,
            params,
            reporter,
        }
    }

    pub fn reporter(&self) -> &'a dyn Reporter {
        self.reporter
    }

    /// Write the guide file for `input`.
    ///
    /// Without an explicit `output`, the guide lands at
    /// [`default_output_path`]. Never fails: any problem comes back as
    /// [`FileOutcome::Failed`].
    pub fn process(&self, input: &Path, output: Option<&Path>) -> FileOutcome {
        match self.try_process(input, output) {
            Ok(summary) => FileOutcome::Written(summary),
            Err(error) => FileOutcome::Failed {
                input: input.to_path_buf(),
                error,
            },
        }
    }

    fn try_process(&self, input: &Path, output: Option<&Path>) -> Result<GuideSummary> {
        self.reporter.message(&format!("Analyzing {}...", input.display()));

        let audio = AudioLoader::load(input)?;
        let estimate = self.tracker.track(
            &audio.mono_samples(),
            audio.sample_rate,
            self.params.tempo_hint,
            self.params.tightness,
        )?;

        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(input));

        self.reporter
            .message(&format!("{} BPM: {:.2}", input.display(), estimate.tempo));
        self.reporter
            .message(&format!("Writing timeline guides to {}...", output.display()));

        let entries = GuideEntry::from_beats(&estimate.beat_times, self.params.offset);
        GuideWriter::write(&output, &entries)?;

        tracing::debug!(
            "{} -> {} ({} beats, tracker {})",
            input.display(),
            output.display(),
            entries.len(),
            self.tracker.name()
        );

        Ok(GuideSummary {
            input: input.to_path_buf(),
            output,
            tempo: estimate.tempo,
            beats: entries.len(),
        })
    }
}
