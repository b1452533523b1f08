use crate::artifact::ArtifactFile;
use crate::error::Error;
use crate::scanner::Scanner;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use std::time::SystemTime;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metadata {
    pub total_bytes: u64,
    pub frame_count: u32,
    pub last_modified: Option<SystemTime>,
}

impl Metadata {
    pub fn add(&mut self, file: &ArtifactFile) {
        self.total_bytes += file.size_bytes;
        self.frame_count = self.frame_count.saturating_add(1);
        self.last_modified = Some(match self.last_modified {
            Some(t) => t.max(file.modified_at),
            None => file.modified_at,
        });
    }

    pub fn size_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }

    /// `YYYY-MM-DD HH:MM:SS` in local time, or `-`.
    pub fn modified_label(&self) -> String {
        match self.last_modified {
            Some(t) => DateTime::<Local>::from(t)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            None => "-".to_string(),
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {:.2} MB", self.size_mb())?;
        writeln!(f, "Frames: {}", self.frame_count)?;
        write!(f, "Modified: {}", self.modified_label())
    }
}

/// Totals for every artifact of `base_name` at `revision` under `root`.
/// No match is not an error: the fields stay zero and `None`.
pub fn summarize_with(
    scanner: &Scanner,
    root: &Path,
    base_name: &str,
    revision: u32,
) -> Result<Metadata, Error> {
    let mut meta = Metadata::default();
    for file in scanner.scan(root) {
        let file = file?;
        if file.identity.base_name == base_name && file.identity.revision == revision {
            meta.add(&file);
        }
    }
    Ok(meta)
}

pub fn summarize(root: &Path, base_name: &str, revision: u32) -> Result<Metadata, Error> {
    summarize_with(&Scanner::default(), root, base_name, revision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::revisions::tests::file;
    use std::time::Duration;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_empty_metadata_renders_dash() {
        let meta = Metadata::default();
        assert_eq!(meta.to_string(), "Size: 0.00 MB\nFrames: 0\nModified: -");
    }

    #[test]
    fn test_add_tracks_latest_mtime() {
        let mut a = file("F_v1.1.vdb");
        a.size_bytes = 1024 * 1024;
        a.modified_at = UNIX_EPOCH + Duration::from_secs(2_000);
        let mut b = file("F_v1.2.vdb");
        b.size_bytes = 512 * 1024;
        b.modified_at = UNIX_EPOCH + Duration::from_secs(1_000);

        let mut meta = Metadata::default();
        meta.add(&a);
        meta.add(&b);

        assert_eq!(meta.total_bytes, 1024 * 1024 + 512 * 1024);
        assert_eq!(meta.frame_count, 2);
        assert_eq!(meta.last_modified, Some(a.modified_at));
        assert!(meta.to_string().starts_with("Size: 1.50 MB\nFrames: 2\n"));
    }
}
