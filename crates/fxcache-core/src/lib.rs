pub mod analysis;
pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod scanner;

pub use analysis::{FrameSequence, Metadata, PrunePlan, PruneReport, RevisionTable};
pub use artifact::{ArtifactFile, ArtifactIdentity, ArtifactKind, KindFilter};
pub use config::AppConfig;
pub use engine::CacheEngine;
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::{CancelToken, Scanner};
