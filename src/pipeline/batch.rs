use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio::loader::AudioLoader;
use crate::error::{Result, ValidationError};
use crate::pipeline::processor::{FileOutcome, FileProcessor, GUIDE_SUFFIX};

/// One input file and the guide file it produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Totals for a finished batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Files attempted, including the ones that failed
    pub processed: usize,
    pub written: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Nothing matched; the output directory was left alone
    NoFilesFound { input_dir: PathBuf },
    Completed(BatchReport),
}

/// List the supported audio files directly inside `input_dir`.
///
/// Not recursive. Jobs come back sorted by file name and each one writes
/// `<output_dir>/<stem>_beats.txt`.
pub fn discover(input_dir: &Path, output_dir: &Path) -> Result<Vec<BatchJob>> {
    let mut jobs = Vec::new();

    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let input = entry.path();
        if !AudioLoader::is_supported_path(&input) {
            continue;
        }

        let mut name = input.file_stem().map(OsStr::to_os_string).unwrap_or_default();
        name.push(GUIDE_SUFFIX);
        let output = output_dir.join(name);
        jobs.push(BatchJob { input, output });
    }

    jobs.sort_by(|a, b| a.input.file_name().cmp(&b.input.file_name()));
    Ok(jobs)
}

/// Process every supported file in `input_dir`.
///
/// A file that fails is logged and skipped. Only problems with the
/// directories themselves end the run early.
pub fn run_batch(
    processor: &FileProcessor<'_>,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BatchOutcome> {
    if !input_dir.is_dir() {
        return Err(ValidationError::InputDirectoryNotFound {
            path: input_dir.to_path_buf(),
        }
        .into());
    }
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ValidationError::OutputDirectory {
            path: output_dir.to_path_buf(),
            reason: "exists and is not a directory".to_string(),
        }
        .into());
    }

    let reporter = processor.reporter();
    reporter.message(&format!(
        "Batch mode activated. Processing all supported audio files in {}",
        input_dir.display()
    ));

    let jobs = discover(input_dir, output_dir)?;
    if jobs.is_empty() {
        return Ok(BatchOutcome::NoFilesFound {
            input_dir: input_dir.to_path_buf(),
        });
    }

    fs::create_dir_all(output_dir).map_err(|e| ValidationError::OutputDirectory {
        path: output_dir.to_path_buf(),
        reason: format!("could not be created: {}", e),
    })?;

    tracing::debug!("{} file(s) queued for {}", jobs.len(), output_dir.display());

    reporter.batch_started(jobs.len());
    let mut written = 0;
    for job in &jobs {
        let outcome = processor.process(&job.input, Some(&job.output));
        outcome.log();
        if let FileOutcome::Written(_) = outcome {
            written += 1;
        }
        reporter.file_finished();
    }
    reporter.batch_finished();

    Ok(BatchOutcome::Completed(BatchReport {
        processed: jobs.len(),
        written,
        output_dir: output_dir.to_path_buf(),
    }))
}
