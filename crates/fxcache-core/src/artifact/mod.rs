pub mod identity;
pub mod kind;

use std::path::PathBuf;
use std::time::SystemTime;

pub use identity::{is_revision_dir, parse, parse_revision, ArtifactIdentity, SequenceKey};
pub use kind::{ArtifactKind, KindFilter};

/// One artifact discovered on disk during a single scan.
#[derive(Debug, Clone)]
pub struct ArtifactFile {
    pub identity: ArtifactIdentity,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified_at: SystemTime,
}
