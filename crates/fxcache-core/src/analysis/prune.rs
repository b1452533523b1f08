use super::revisions::{resolve, RevisionTable};
use crate::artifact::{is_revision_dir, ArtifactFile};
use crate::error::Error;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::scanner::{collect_scope, Scanner};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// A file or directory the pruner could not remove.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to remove {}: {message}", .path.display())]
pub struct DeleteError {
    pub path: PathBuf,
    pub message: String,
}

/// Files selected for deletion, computed without touching the tree.
#[derive(Debug, Clone, Default)]
pub struct PrunePlan {
    pub doomed: Vec<ArtifactFile>,
    pub kept: usize,
}

impl PrunePlan {
    pub fn reclaimable_bytes(&self) -> u64 {
        self.doomed.iter().map(|f| f.size_bytes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.doomed.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    pub deleted_files: Vec<PathBuf>,
    pub removed_dirs: Vec<PathBuf>,
    pub failures: Vec<DeleteError>,
    pub reclaimed_bytes: u64,
}

impl PruneReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for PruneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files deleted, {} folders removed, {} failures",
            self.deleted_files.len(),
            self.removed_dirs.len(),
            self.failures.len()
        )
    }
}

/// Deletes superseded revisions under one scope.
pub struct Pruner<'r> {
    scanner: Scanner,
    reporter: &'r dyn ProgressReporter,
}

impl Default for Pruner<'_> {
    fn default() -> Self {
        Self {
            scanner: Scanner::default(),
            reporter: &SilentReporter,
        }
    }
}

impl<'r> Pruner<'r> {
    pub fn new(scanner: Scanner, reporter: &'r dyn ProgressReporter) -> Self {
        Self { scanner, reporter }
    }

    /// Scan `root` afresh and decide which files `table` supersedes.
    ///
    /// Files newer than the table's entry, or whose base name the table does
    /// not know, are kept. The plan is refused when it would leave a base name
    /// without a file at its on-disk latest revision.
    pub fn plan(&self, root: &Path, table: &RevisionTable) -> Result<PrunePlan, Error> {
        let files = collect_scope(&self.scanner, root)?;
        let on_disk = resolve(&files);

        let mut plan = PrunePlan::default();
        let mut survivors: HashSet<&str> = HashSet::new();
        for file in &files {
            if table.is_superseded(&file.identity) {
                plan.doomed.push(file.clone());
            } else {
                if on_disk.is_latest(&file.identity) {
                    survivors.insert(file.identity.base_name.as_str());
                }
                plan.kept += 1;
            }
        }

        if let Some((base_name, latest)) = on_disk
            .iter()
            .find(|(base_name, _)| !survivors.contains(base_name))
        {
            error!(
                "Prune of {} would remove every file of '{}' at revision v{}",
                root.display(),
                base_name,
                latest
            );
            return Err(Error::InvariantViolation(format!(
                "no file of '{}' at latest revision v{} would survive",
                base_name, latest
            )));
        }

        debug!(
            "Prune plan for {}: {} to delete, {} kept",
            root.display(),
            plan.doomed.len(),
            plan.kept
        );
        Ok(plan)
    }

    /// Delete the planned files, then remove emptied revision folders.
    ///
    /// Failures are logged and collected; they never stop the batch.
    pub fn execute(&self, root: &Path, plan: &PrunePlan) -> PruneReport {
        let mut report = PruneReport::default();
        self.reporter.on_prune_start(plan.doomed.len());
        let start = Instant::now();

        for file in &plan.doomed {
            match fs::remove_file(&file.path) {
                Ok(()) => {
                    debug!("Deleted old cache: {}", file.path.display());
                    report.reclaimed_bytes += file.size_bytes;
                    report.deleted_files.push(file.path.clone());
                    self.reporter.on_file_deleted(&file.path);
                }
                Err(e) => {
                    error!("Failed to remove '{}': {}", file.path.display(), e);
                    report.failures.push(DeleteError {
                        path: file.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        self.remove_empty_revision_dirs(root, &mut report);

        self.reporter.on_prune_complete(
            report.deleted_files.len(),
            report.failures.len(),
            start.elapsed().as_secs_f64(),
        );
        info!("Prune of {}: {}", root.display(), report);
        report
    }

    /// Plan against `table` and execute.
    pub fn prune(&self, root: &Path, table: &RevisionTable) -> Result<PruneReport, Error> {
        let plan = self.plan(root, table)?;
        Ok(self.execute(root, &plan))
    }

    /// Resolve `root` and prune it against its own latest revisions.
    pub fn prune_superseded(&self, root: &Path) -> Result<PruneReport, Error> {
        let files = collect_scope(&self.scanner, root)?;
        let table = resolve(&files);
        self.prune(root, &table)
    }

    /// Remove empty `v<digits>` folders, deepest first.
    ///
    /// Ignored subtrees are never entered. The walk is pre-order so that
    /// `filter_entry` can prune them; reversing it visits children before
    /// their parents.
    fn remove_empty_revision_dirs(&self, root: &Path, report: &mut PruneReport) {
        let candidates: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.scanner.is_ignored(e.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry during cleanup: {}", e);
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_dir()
                    && entry.file_name().to_str().is_some_and(is_revision_dir)
            })
            .map(|entry| entry.into_path())
            .collect();

        for dir in candidates.into_iter().rev() {
            let is_empty = match fs::read_dir(&dir) {
                Ok(mut children) => children.next().is_none(),
                Err(e) => {
                    warn!("Cannot list {}: {}", dir.display(), e);
                    false
                }
            };
            if !is_empty {
                continue;
            }
            match fs::remove_dir(&dir) {
                Ok(()) => {
                    debug!("Removed empty folder: {}", dir.display());
                    report.removed_dirs.push(dir);
                }
                Err(e) => {
                    error!("Failed to remove '{}': {}", dir.display(), e);
                    report.failures.push(DeleteError {
                        path: dir,
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Prune `root` against `table` with default scan settings.
pub fn prune(root: &Path, table: &RevisionTable) -> Result<PruneReport, Error> {
    Pruner::default().prune(root, table)
}
