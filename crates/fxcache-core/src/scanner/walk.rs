use super::cancel::CancelToken;
use crate::artifact::{ArtifactFile, ArtifactIdentity, KindFilter};
use crate::error::Error;
use glob::Pattern;
use std::path::Path;
use tracing::{debug, error, trace};
use walkdir::{DirEntry, WalkDir};

/// Scan settings shared by every operation that walks a cache tree.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    filter: KindFilter,
    ignore_patterns: Vec<Pattern>,
    cancel: Option<CancelToken>,
}

impl Scanner {
    pub fn new(filter: KindFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Invalid globs are logged and dropped.
    pub fn with_ignore_globs(mut self, globs: &[String]) -> Self {
        self.ignore_patterns = globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    /// Same ignore rules and cancellation, different kind filter.
    pub fn with_filter(&self, filter: KindFilter) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    pub(crate) fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }

    /// Start a lazy, single-pass walk of `root`.
    pub fn scan(&self, root: &Path) -> Scan {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Scan {
            scanner: self.clone(),
            walker,
            finished: false,
        }
    }
}

/// Walk `root` with no ignore rules and no cancellation.
pub fn scan(root: &Path, filter: KindFilter) -> Scan {
    Scanner::new(filter).scan(root)
}

/// Iterator over the artifacts under one root.
///
/// IO errors are yielded in place and the walk carries on past them, so a
/// consumer sees every artifact that was reachable. A cancelled walk yields
/// `Error::Cancelled` once and then stops.
pub struct Scan {
    scanner: Scanner,
    walker: walkdir::IntoIter,
    finished: bool,
}

impl Scan {
    fn is_cancelled(&self) -> bool {
        self.scanner
            .cancel
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
    }

    fn artifact(&self, entry: DirEntry) -> Result<Option<ArtifactFile>, Error> {
        let Some(identity) = entry.file_name().to_str().and_then(ArtifactIdentity::parse) else {
            return Ok(None);
        };
        if !self.scanner.filter.accepts(identity.kind) {
            trace!("Filtered out {}", entry.path().display());
            return Ok(None);
        }

        let metadata = entry.metadata()?;
        let path = entry.into_path();
        let modified_at = metadata.modified().map_err(|e| Error::io(&path, e))?;

        Ok(Some(ArtifactFile {
            identity,
            path,
            size_bytes: metadata.len(),
            modified_at,
        }))
    }
}

impl Iterator for Scan {
    type Item = Result<ArtifactFile, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error walking cache tree: {}", err);
                    return Some(Err(err.into()));
                }
            };

            if entry.file_type().is_dir() {
                if self.is_cancelled() {
                    debug!("Scan cancelled at {}", entry.path().display());
                    self.finished = true;
                    return Some(Err(Error::Cancelled));
                }
                if entry.depth() > 0 && self.scanner.is_ignored(entry.path()) {
                    debug!("Ignoring directory {}", entry.path().display());
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() || self.scanner.is_ignored(entry.path()) {
                continue;
            }

            match self.artifact(entry) {
                Ok(Some(file)) => {
                    trace!("Found artifact {}", file.path.display());
                    return Some(Ok(file));
                }
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
