//! JSON and text I/O for matches and tracks.
//!
//! - `load_pairwise_matches`: read upstream matches from a JSON file.
//! - `save_pairwise_matches`: write matches in the same format.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - `write_tracks_text_file`: write the diagnostic text export of tracks.
//!
//! Matches files hold an array of view-pair records:
//!
//! ```json
//! [
//!   { "view_i": 0, "view_j": 1, "matches": { "sift": [[12, 40], [3, 7]] } }
//! ]
//! ```
use crate::matching::{IndMatch, PairwiseMatches};
use crate::tracks::write_tracks_text;
use crate::types::{DescriberType, TracksMap, ViewId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Matches of one view pair as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairMatchesRecord {
    pub view_i: ViewId,
    pub view_j: ViewId,
    pub matches: BTreeMap<DescriberType, Vec<[usize; 2]>>,
}

/// Convert on-disk records into pairwise matches. Records of the same view
/// pair are merged.
pub fn matches_from_records(records: Vec<PairMatchesRecord>) -> PairwiseMatches {
    let mut matches = PairwiseMatches::new();
    for record in records {
        let per_type = matches.entry((record.view_i, record.view_j)).or_default();
        for (desc_type, pairs) in record.matches {
            per_type
                .entry(desc_type)
                .or_default()
                .extend(pairs.into_iter().map(|[i, j]| IndMatch::new(i, j)));
        }
    }
    matches
}

/// Inverse of [`matches_from_records`].
pub fn matches_to_records(matches: &PairwiseMatches) -> Vec<PairMatchesRecord> {
    matches
        .iter()
        .map(|(&(view_i, view_j), per_type)| PairMatchesRecord {
            view_i,
            view_j,
            matches: per_type
                .iter()
                .map(|(&t, pairs)| (t, pairs.iter().map(|m| [m.i, m.j]).collect()))
                .collect(),
        })
        .collect()
}

/// Load pairwise matches from a JSON file.
pub fn load_pairwise_matches(path: &Path) -> Result<PairwiseMatches, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read matches {}: {e}", path.display()))?;
    let records: Vec<PairMatchesRecord> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse matches {}: {e}", path.display()))?;
    Ok(matches_from_records(records))
}

/// Save pairwise matches to a JSON file, creating parent directories.
pub fn save_pairwise_matches(path: &Path, matches: &PairwiseMatches) -> Result<(), String> {
    write_json_file(path, &matches_to_records(matches))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Write the diagnostic text export of `tracks` to `path`.
pub fn write_tracks_text_file(path: &Path, tracks: &TracksMap) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let file =
        File::create(path).map_err(|e| format!("Failed to create {}: {e}", path.display()))?;
    write_tracks_text(tracks, BufWriter::new(file))
        .map_err(|e| format!("Failed to write tracks {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::insert_matches;

    #[test]
    fn records_merge_duplicate_view_pairs() {
        let json = r#"[
            { "view_i": 0, "view_j": 1, "matches": { "sift": [[1, 2]] } },
            { "view_i": 0, "view_j": 1, "matches": { "sift": [[3, 4]], "akaze": [[5, 6]] } }
        ]"#;
        let records: Vec<PairMatchesRecord> = serde_json::from_str(json).unwrap();
        let matches = matches_from_records(records);
        assert_eq!(matches.len(), 1);
        let per_type = &matches[&(0, 1)];
        assert_eq!(
            per_type[&DescriberType::Sift],
            vec![IndMatch::new(1, 2), IndMatch::new(3, 4)]
        );
        assert_eq!(per_type[&DescriberType::Akaze], vec![IndMatch::new(5, 6)]);
    }

    #[test]
    fn records_convert_back_to_matches() {
        let mut matches = PairwiseMatches::new();
        insert_matches(&mut matches, 2, 5, DescriberType::Cctag3, [(0, 9)]);
        let records = matches_to_records(&matches);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].matches[&DescriberType::Cctag3], vec![[0, 9]]);
        assert_eq!(matches_from_records(records), matches);
    }

    #[test]
    fn unknown_describer_is_a_parse_error() {
        let json = r#"[{ "view_i": 0, "view_j": 1, "matches": { "orb": [[1, 2]] } }]"#;
        assert!(serde_json::from_str::<Vec<PairMatchesRecord>>(json).is_err());
    }
}
