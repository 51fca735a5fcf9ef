use std::cell::RefCell;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives user-facing progress from the pipeline.
///
/// Errors do not go through here; they are logged with `tracing`.
pub trait Reporter {
    /// A one-line progress message
    fn message(&self, line: &str);

    /// A batch of `total` files is about to be processed
    fn batch_started(&self, _total: usize) {}

    /// One batch file is done, whatever its outcome
    fn file_finished(&self) {}

    /// The batch loop is over
    fn batch_finished(&self) {}
}

/// Prints progress to stdout, with a progress bar during batch runs
pub struct ConsoleReporter {
    show_progress: bool,
    bar: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            bar: RefCell::new(None),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn message(&self, line: &str) {
        match self.bar.borrow().as_ref() {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    fn batch_started(&self, total: usize) {
        if !self.show_progress {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("Processing files: {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        *self.bar.borrow_mut() = Some(bar);
    }

    fn file_finished(&self) {
        if let Some(bar) = self.bar.borrow().as_ref() {
            bar.inc(1);
        }
    }

    fn batch_finished(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish();
        }
    }
}

/// Swallows everything
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn message(&self, _line: &str) {}
}
