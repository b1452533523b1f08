use super::kind::ArtifactKind;
use crate::error::Error;
use regex::Regex;

lazy_static::lazy_static! {
    /// `<base_name>_v<revision>.<frame>.<ext>`; the lazy base name stops at the
    /// first suffix that lets the whole name match.
    static ref ARTIFACT_NAME: Regex =
        Regex::new(r"^(.+?)_v(\d+)\.(\d+)\.(bgeo\.sc|vdb|abc)$")
            .expect("artifact name pattern is valid");

    static ref REVISION_DIR: Regex =
        Regex::new(r"^v\d+$").expect("revision dir pattern is valid");
}

/// Structured identity of one per-frame cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactIdentity {
    pub base_name: String,
    pub revision: u32,
    pub frame: u32,
    pub kind: ArtifactKind,
    revision_digits: usize,
    frame_digits: usize,
}

/// Grouping key shared by every frame of one (base name, revision, kind).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    pub base_name: String,
    pub revision: u32,
    pub kind: ArtifactKind,
}

impl ArtifactIdentity {
    /// Parse a bare file name. Anything that is not an artifact yields `None`.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = ARTIFACT_NAME.captures(file_name)?;
        let revision_str = caps.get(2)?.as_str();
        let frame_str = caps.get(3)?.as_str();

        Some(ArtifactIdentity {
            base_name: caps.get(1)?.as_str().to_string(),
            revision: revision_str.parse().ok()?,
            frame: frame_str.parse().ok()?,
            kind: ArtifactKind::from_extension(caps.get(4)?.as_str())?,
            revision_digits: revision_str.len(),
            frame_digits: frame_str.len(),
        })
    }

    pub fn key(&self) -> SequenceKey {
        SequenceKey {
            base_name: self.base_name.clone(),
            revision: self.revision,
            kind: self.kind,
        }
    }

    /// Revision as written on disk, e.g. `v003`.
    pub fn revision_label(&self) -> String {
        format!("v{:0width$}", self.revision, width = self.revision_digits)
    }

    /// Frame number as written on disk, leading zeros included.
    pub fn frame_label(&self) -> String {
        format!("{:0width$}", self.frame, width = self.frame_digits)
    }

    pub fn revision_digits(&self) -> usize {
        self.revision_digits
    }

    pub fn frame_digits(&self) -> usize {
        self.frame_digits
    }

    /// Rebuild the file name this identity was parsed from.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}.{}",
            self.base_name,
            self.revision_label(),
            self.frame_label(),
            self.kind.extension()
        )
    }
}

/// Parse a single artifact file name.
pub fn parse(file_name: &str) -> Option<ArtifactIdentity> {
    ArtifactIdentity::parse(file_name)
}

/// True for directory names of the bare `v<digits>` form.
pub fn is_revision_dir(name: &str) -> bool {
    REVISION_DIR.is_match(name)
}

/// Accepts `3`, `v3` or `v003`.
pub fn parse_revision(input: &str) -> Result<u32, Error> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidRevision(input.to_string()));
    }
    digits
        .parse()
        .map_err(|_| Error::InvalidRevision(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geometry_cache() {
        let id = parse("FOAM_v1.1001.bgeo.sc").unwrap();
        assert_eq!(id.base_name, "FOAM");
        assert_eq!(id.revision, 1);
        assert_eq!(id.frame, 1001);
        assert_eq!(id.kind, ArtifactKind::GeometryCache);
    }

    #[test]
    fn test_parse_each_kind() {
        assert_eq!(
            parse("SMOKE_v3.1000.vdb").unwrap().kind,
            ArtifactKind::VolumeCache
        );
        assert_eq!(
            parse("CHAR_v12.0042.abc").unwrap().kind,
            ArtifactKind::AlembicCache
        );
    }

    #[test]
    fn test_round_trip_preserves_padding() {
        for name in [
            "FOAM_v1.1001.bgeo.sc",
            "OCEAN_FOAM_v002.0007.vdb",
            "shot010_fx_v10.0.abc",
            "a b c_v7.000123.bgeo.sc",
        ] {
            let id = parse(name).unwrap();
            assert_eq!(id.file_name(), name);
        }
    }

    #[test]
    fn test_leading_zeros_compare_numerically() {
        let a = parse("X_v1.0009.vdb").unwrap();
        let b = parse("X_v1.10.vdb").unwrap();
        assert_eq!(a.frame, 9);
        assert!(a.frame < b.frame);
        assert_eq!(a.frame_label(), "0009");
    }

    #[test]
    fn test_base_name_is_minimal_up_to_first_suffix() {
        // `_v2.` inside the base name only splits when the rest is a valid suffix.
        let id = parse("SIM_v2.5_wip_v3.1001.vdb").unwrap();
        assert_eq!(id.base_name, "SIM_v2.5_wip");
        assert_eq!(id.revision, 3);

        let id = parse("RIG_v2_v4.0010.abc").unwrap();
        assert_eq!(id.base_name, "RIG_v2");
        assert_eq!(id.revision, 4);
    }

    #[test]
    fn test_rejects_non_artifacts() {
        for name in [
            "FOAM_v1.1001.exr",
            "FOAM.1001.bgeo.sc",
            "FOAM_v1.abcd.vdb",
            "FOAM_vX.1001.vdb",
            "FOAM_v1.1001.bgeo",
            "_v1.1001.vdb",
            "FOAM_v1.1001.vdb.bak",
            "notes.txt",
            "",
        ] {
            assert!(parse(name).is_none(), "{name} should not parse");
        }
    }

    #[test]
    fn test_rejects_overflowing_numbers() {
        assert!(parse("FOAM_v99999999999.1.vdb").is_none());
        assert!(parse("FOAM_v1.99999999999.vdb").is_none());
    }

    #[test]
    fn test_revision_dir_names() {
        assert!(is_revision_dir("v1"));
        assert!(is_revision_dir("v010"));
        assert!(!is_revision_dir("v"));
        assert!(!is_revision_dir("v1a"));
        assert!(!is_revision_dir("OCEAN_v1"));
    }

    #[test]
    fn test_parse_revision_argument() {
        assert_eq!(parse_revision("3").unwrap(), 3);
        assert_eq!(parse_revision("v3").unwrap(), 3);
        assert_eq!(parse_revision("v003").unwrap(), 3);
        assert!(parse_revision("v").is_err());
        assert!(parse_revision("latest").is_err());
    }
}
