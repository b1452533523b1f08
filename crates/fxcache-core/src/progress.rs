use std::path::Path;

/// Trait for reporting scan and prune progress.
///
/// The CLI implements it with indicatif spinners. All methods have default
/// no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root: &Path) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &Path) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_prune_start(&self, _files_to_delete: usize) {}
    fn on_file_deleted(&self, _path: &Path) {}
    fn on_prune_complete(&self, _deleted: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
