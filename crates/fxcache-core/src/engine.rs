use crate::analysis::{self, FrameSequence, Metadata, PrunePlan, PruneReport, Pruner};
use crate::artifact::{ArtifactFile, KindFilter};
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::scanner::{self, CancelToken, Scanner};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Entry points for a presentation layer.
///
/// The engine holds no cache root. Every call names its scope, so the
/// caller owns which root is currently selected.
pub struct CacheEngine<'r> {
    scanner: Scanner,
    reporter: &'r dyn ProgressReporter,
}

impl Default for CacheEngine<'_> {
    fn default() -> Self {
        Self {
            scanner: Scanner::default(),
            reporter: &SilentReporter,
        }
    }
}

impl<'r> CacheEngine<'r> {
    pub fn new(config: &AppConfig, reporter: &'r dyn ProgressReporter) -> Self {
        Self {
            scanner: Scanner::new(config.default_filter)
                .with_ignore_globs(&config.ignore_patterns),
            reporter,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.scanner = self.scanner.with_cancel(token);
        self
    }

    fn collect(&self, scanner: &Scanner, scope: &Path) -> Result<Vec<ArtifactFile>, Error> {
        self.reporter.on_scan_start(scope);
        let start = Instant::now();
        let mut files = Vec::new();
        for file in scanner.scan(scope) {
            let file = file?;
            self.reporter.on_scan_progress(files.len() + 1, &file.path);
            files.push(file);
        }
        let elapsed = start.elapsed().as_secs_f64();
        self.reporter.on_scan_complete(files.len(), elapsed);
        debug!(
            "Scanned {} in {:.2}s: {} artifacts",
            scope.display(),
            elapsed,
            files.len()
        );
        Ok(files)
    }

    /// Cache folders under `root` holding at least one artifact of `filter`.
    pub fn list_folders(&self, root: &Path, filter: KindFilter) -> Result<Vec<PathBuf>, Error> {
        scanner::list_folders(&self.scanner.with_filter(filter), root)
    }

    /// Frame sequences of one folder, latest flags resolved within that folder.
    pub fn list_sequences(&self, folder: &Path) -> Result<Vec<FrameSequence>, Error> {
        let files = self.collect(&self.scanner.with_filter(KindFilter::All), folder)?;
        let table = analysis::resolve(&files);
        Ok(analysis::aggregate(&files, &table))
    }

    /// What `delete_superseded` would remove, without removing it.
    pub fn plan_superseded(&self, folder: &Path) -> Result<PrunePlan, Error> {
        let scanner = self.scanner.with_filter(KindFilter::All);
        let files = self.collect(&scanner, folder)?;
        let table = analysis::resolve(&files);
        Pruner::new(scanner, self.reporter).plan(folder, &table)
    }

    /// Run a plan from `plan_superseded` as confirmed, without rescanning.
    pub fn execute_plan(&self, folder: &Path, plan: &PrunePlan) -> PruneReport {
        Pruner::new(self.scanner.with_filter(KindFilter::All), self.reporter).execute(folder, plan)
    }

    /// Delete every non-latest revision in `folder`.
    pub fn delete_superseded(&self, folder: &Path) -> Result<PruneReport, Error> {
        let scanner = self.scanner.with_filter(KindFilter::All);
        let files = self.collect(&scanner, folder)?;
        let table = analysis::resolve(&files);
        info!(
            "Pruning {} ({} base names)",
            folder.display(),
            table.len()
        );
        Pruner::new(scanner, self.reporter).prune(folder, &table)
    }

    pub fn describe(&self, folder: &Path, base_name: &str, revision: u32) -> Result<Metadata, Error> {
        analysis::metadata::summarize_with(
            &self.scanner.with_filter(KindFilter::All),
            folder,
            base_name,
            revision,
        )
    }
}
