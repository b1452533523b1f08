use fxcache_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter using indicatif spinners.
///
/// - Scan phase: spinner with a running artifact count
/// - Prune phase: bar over the planned deletions
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style());
        pb.set_message(format!("Scanning {}...", root.display()));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &Path) {
        self.with_bar(|pb| pb.set_message(format!("Scanning... {} cache files found", files_found)));
    }

    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {
        self.finish_bar();
    }

    fn on_prune_start(&self, files_to_delete: usize) {
        let pb = ProgressBar::new(files_to_delete as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Deleting [{bar:30.red/dim}] {pos}/{len} files",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        self.set_bar(pb);
    }

    fn on_file_deleted(&self, _path: &Path) {
        self.with_bar(|pb| pb.inc(1));
    }

    fn on_prune_complete(&self, deleted: usize, failed: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Prune complete: {} deleted, {} failed in {:.2}s",
            deleted, failed, duration_secs
        );
    }
}
