pub mod metadata;
pub mod prune;
pub mod revisions;
pub mod sequences;

pub use metadata::{summarize, Metadata};
pub use prune::{prune, DeleteError, PrunePlan, PruneReport, Pruner};
pub use revisions::{resolve, RevisionTable};
pub use sequences::{aggregate, FrameSequence};
