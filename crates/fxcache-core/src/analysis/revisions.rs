use crate::artifact::{ArtifactFile, ArtifactIdentity};
use std::collections::HashMap;

/// Highest revision observed per base name within one scope.
///
/// Kind does not take part: a `.vdb` and a `.bgeo.sc` sharing a base name
/// share one latest revision. Partition the input by kind first if per-kind
/// latest is wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionTable {
    latest: HashMap<String, u32>,
}

impl RevisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries only ever grow.
    pub fn observe(&mut self, identity: &ArtifactIdentity) {
        self.latest
            .entry(identity.base_name.clone())
            .and_modify(|rev| *rev = (*rev).max(identity.revision))
            .or_insert(identity.revision);
    }

    pub fn get(&self, base_name: &str) -> Option<u32> {
        self.latest.get(base_name).copied()
    }

    pub fn is_latest(&self, identity: &ArtifactIdentity) -> bool {
        self.get(&identity.base_name) == Some(identity.revision)
    }

    /// True when a newer revision of the same base name exists.
    pub fn is_superseded(&self, identity: &ArtifactIdentity) -> bool {
        self.get(&identity.base_name)
            .is_some_and(|latest| identity.revision < latest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.latest.iter().map(|(name, rev)| (name.as_str(), *rev))
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }
}

impl<'a> FromIterator<&'a ArtifactFile> for RevisionTable {
    fn from_iter<I: IntoIterator<Item = &'a ArtifactFile>>(iter: I) -> Self {
        let mut table = RevisionTable::new();
        for file in iter {
            table.observe(&file.identity);
        }
        table
    }
}

/// Single pass over `files`, keeping the max revision per base name.
pub fn resolve<'a, I>(files: I) -> RevisionTable
where
    I: IntoIterator<Item = &'a ArtifactFile>,
{
    files.into_iter().collect()
}
