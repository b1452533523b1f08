use crate::error::Error;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The kind of cache an artifact file holds, keyed by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    GeometryCache,
    VolumeCache,
    AlembicCache,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::GeometryCache,
        ArtifactKind::VolumeCache,
        ArtifactKind::AlembicCache,
    ];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::GeometryCache => "bgeo.sc",
            ArtifactKind::VolumeCache => "vdb",
            ArtifactKind::AlembicCache => "abc",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.extension() == ext)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Restricts a scan to one artifact kind, or lets every kind through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum KindFilter {
    #[default]
    All,
    Only(ArtifactKind),
}

impl KindFilter {
    pub fn accepts(self, kind: ArtifactKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(only) => only == kind,
        }
    }
}

impl FromStr for KindFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
        ArtifactKind::from_extension(ext)
            .map(KindFilter::Only)
            .ok_or_else(|| Error::InvalidFilter(s.to_string()))
    }
}

impl TryFrom<String> for KindFilter {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFilter::All => f.write_str("All"),
            KindFilter::Only(kind) => write!(f, ".{}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_dropdown_labels() {
        assert_eq!("All".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!("all".parse::<KindFilter>().unwrap(), KindFilter::All);
        assert_eq!(
            ".bgeo.sc".parse::<KindFilter>().unwrap(),
            KindFilter::Only(ArtifactKind::GeometryCache)
        );
        assert_eq!(
            "vdb".parse::<KindFilter>().unwrap(),
            KindFilter::Only(ArtifactKind::VolumeCache)
        );
        assert_eq!(
            ".abc".parse::<KindFilter>().unwrap(),
            KindFilter::Only(ArtifactKind::AlembicCache)
        );
    }

    #[test]
    fn test_filter_rejects_unknown_extension() {
        assert!(matches!(
            ".exr".parse::<KindFilter>(),
            Err(Error::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_filter_accepts() {
        assert!(KindFilter::All.accepts(ArtifactKind::AlembicCache));
        assert!(KindFilter::Only(ArtifactKind::VolumeCache).accepts(ArtifactKind::VolumeCache));
        assert!(!KindFilter::Only(ArtifactKind::VolumeCache).accepts(ArtifactKind::GeometryCache));
    }
}
