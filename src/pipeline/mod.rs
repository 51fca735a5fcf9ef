//! # Pipeline Module
//!
//! Drives audio files through decoding, beat tracking and guide writing.
//!
//! A single run processes one file; a batch run processes every supported
//! file in a directory. In both, a failure on one file is reported as a
//! [`FileOutcome::Failed`] and never aborts anything beyond that file.

pub mod batch;
pub mod processor;
pub mod report;

use std::path::Path;

use crate::audio::BeatTracker;
use crate::config::AnalysisParameters;
use crate::error::{Result, ValidationError};

pub use batch::{discover, run_batch, BatchJob, BatchOutcome, BatchReport};
pub use processor::{default_output_path, FileOutcome, FileProcessor, GuideSummary, GUIDE_SUFFIX};
pub use report::{ConsoleReporter, Reporter, SilentReporter};

/// Process one file.
///
/// The input must exist as a regular file; otherwise the run stops with
/// [`ValidationError::InputNotFound`] before the tracker is touched.
pub fn run_single(
    tracker: &dyn BeatTracker,
    input: &Path,
    output: Option<&Path>,
    params: &AnalysisParameters,
    reporter: &dyn Reporter,
) -> Result<FileOutcome> {
    if !input.is_file() {
        return Err(ValidationError::InputNotFound {
            path: input.to_path_buf(),
        }
        .into());
    }

    let outcome = FileProcessor::new(tracker, params, reporter).process(input, output);
    outcome.log();
    Ok(outcome)
}
