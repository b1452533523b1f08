pub mod cancel;
pub mod walk;

pub use cancel::CancelToken;
pub use walk::{scan, Scan, Scanner};

use crate::artifact::{is_revision_dir, ArtifactFile};
use crate::error::Error;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collect a whole scope, failing on the first error.
///
/// Operations that need total coverage (resolving, pruning) must not work
/// from a partial walk.
pub fn collect_scope(scanner: &Scanner, root: &Path) -> Result<Vec<ArtifactFile>, Error> {
    scanner.scan(root).collect()
}

/// The cache folder an artifact belongs to: its parent directory, or the
/// parent's parent when the file sits inside a `v<digits>` revision folder.
pub fn cache_folder_of(file: &Path) -> Option<&Path> {
    let parent = file.parent()?;
    let in_revision_dir = parent
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(is_revision_dir);
    if in_revision_dir {
        parent.parent()
    } else {
        Some(parent)
    }
}

/// Distinct cache folders under `root`, relative to it and sorted.
pub fn list_folders(scanner: &Scanner, root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut folders = BTreeSet::new();
    for file in scanner.scan(root) {
        let file = file?;
        let Some(folder) = cache_folder_of(&file.path) else {
            continue;
        };
        let relative = match folder.strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            // A revision folder directly under root maps above it.
            Err(_) => PathBuf::from("."),
        };
        folders.insert(relative);
    }
    debug!("{} cache folders under {}", folders.len(), root.display());
    Ok(folders.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_folder_of_revision_layout() {
        let file = Path::new("/caches/OCEAN_FOAM/v2/FOAM_v2.1001.bgeo.sc");
        assert_eq!(
            cache_folder_of(file),
            Some(Path::new("/caches/OCEAN_FOAM"))
        );
    }

    #[test]
    fn test_cache_folder_of_flat_layout() {
        let file = Path::new("/caches/SMOKE/SMOKE_v3.1000.vdb");
        assert_eq!(cache_folder_of(file), Some(Path::new("/caches/SMOKE")));
    }
}
