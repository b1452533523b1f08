use super::revisions::RevisionTable;
use crate::artifact::{ArtifactFile, ArtifactKind, SequenceKey};
use std::collections::HashMap;
use std::fmt;

/// Frame span of one (base name, revision, kind) group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    pub base_name: String,
    pub revision: u32,
    pub kind: ArtifactKind,
    pub frame_min: u32,
    pub frame_max: u32,
    pub is_latest: bool,
    revision_digits: usize,
    frame_digits: usize,
}

impl FrameSequence {
    pub fn key(&self) -> SequenceKey {
        SequenceKey {
            base_name: self.base_name.clone(),
            revision: self.revision,
            kind: self.kind,
        }
    }
}

/// `FOAM (v2).bgeo.sc (1001-1001) [LATEST]`
impl fmt::Display for FrameSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (v{:0rw$}).{} ({:0fw$}-{:0fw$})",
            self.base_name,
            self.revision,
            self.kind,
            self.frame_min,
            self.frame_max,
            rw = self.revision_digits,
            fw = self.frame_digits,
        )?;
        if self.is_latest {
            f.write_str(" [LATEST]")?;
        }
        Ok(())
    }
}

struct Group {
    key: SequenceKey,
    frames: Vec<u32>,
    revision_digits: usize,
    frame_digits: usize,
}

/// Group `files` by sequence key, in first-seen order, and reduce each group
/// to its frame extremes.
pub fn aggregate<'a, I>(files: I, table: &RevisionTable) -> Vec<FrameSequence>
where
    I: IntoIterator<Item = &'a ArtifactFile>,
{
    let mut index: HashMap<SequenceKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for file in files {
        let id = &file.identity;
        let slot = *index.entry(id.key()).or_insert_with(|| {
            groups.push(Group {
                key: id.key(),
                frames: Vec::new(),
                revision_digits: id.revision_digits(),
                frame_digits: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.frames.push(id.frame);
        group.frame_digits = group.frame_digits.max(id.frame_digits());
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            group.frames.sort_unstable();
            let frame_min = *group.frames.first()?;
            let frame_max = *group.frames.last()?;
            let is_latest = table.get(&group.key.base_name) == Some(group.key.revision);
            Some(FrameSequence {
                base_name: group.key.base_name,
                revision: group.key.revision,
                kind: group.key.kind,
                frame_min,
                frame_max,
                is_latest,
                revision_digits: group.revision_digits,
                frame_digits: group.frame_digits,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::revisions::resolve;
    use crate::analysis::revisions::tests::file;

    #[test]
    fn test_aggregate_foam_scenario() {
        let files = vec![
            file("FOAM_v1.1001.bgeo.sc"),
            file("FOAM_v1.1002.bgeo.sc"),
            file("FOAM_v2.1001.bgeo.sc"),
        ];
        let table = resolve(&files);
        let seqs = aggregate(&files, &table);
        let rendered: Vec<String> = seqs.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "FOAM (v1).bgeo.sc (1001-1002)",
                "FOAM (v2).bgeo.sc (1001-1001) [LATEST]",
            ]
        );
    }

    #[test]
    fn test_aggregate_sorts_frames_within_group() {
        let files = vec![
            file("W_v1.0030.vdb"),
            file("W_v1.0002.vdb"),
            file("W_v1.0010.vdb"),
            file("W_v1.0010.vdb"),
        ];
        let table = resolve(&files);
        let seqs = aggregate(&files, &table);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].frame_min, 2);
        assert_eq!(seqs[0].frame_max, 30);
        assert_eq!(seqs[0].to_string(), "W (v1).vdb (0002-0030) [LATEST]");
    }

    #[test]
    fn test_aggregate_keeps_first_seen_order() {
        let files = vec![
            file("B_v1.1.abc"),
            file("A_v1.1.abc"),
            file("B_v1.2.abc"),
            file("A_v1.1.vdb"),
        ];
        let table = resolve(&files);
        let names: Vec<(String, ArtifactKind)> = aggregate(&files, &table)
            .into_iter()
            .map(|s| (s.base_name, s.kind))
            .collect();
        assert_eq!(
            names,
            vec![
                ("B".to_string(), ArtifactKind::AlembicCache),
                ("A".to_string(), ArtifactKind::AlembicCache),
                ("A".to_string(), ArtifactKind::VolumeCache),
            ]
        );
    }

    #[test]
    fn test_aggregate_min_never_exceeds_max() {
        let files = vec![
            file("S_v1.9.vdb"),
            file("S_v1.0100.vdb"),
            file("S_v2.5.vdb"),
            file("T_v3.42.abc"),
        ];
        let table = resolve(&files);
        for seq in aggregate(&files, &table) {
            assert!(seq.frame_min <= seq.frame_max, "{seq}");
        }
    }

    #[test]
    fn test_aggregate_latest_flag_is_kind_agnostic() {
        let files = vec![file("FX_v2.1.vdb"), file("FX_v2.1.bgeo.sc"), file("FX_v1.1.vdb")];
        let table = resolve(&files);
        let latest: Vec<bool> = aggregate(&files, &table)
            .iter()
            .map(|s| s.is_latest)
            .collect();
        assert_eq!(latest, vec![true, true, false]);
    }

    #[test]
    fn test_aggregate_empty_input() {
        let files: Vec<ArtifactFile> = Vec::new();
        assert!(aggregate(&files, &RevisionTable::new()).is_empty());
    }
}
