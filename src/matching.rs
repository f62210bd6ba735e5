//! Input shape produced by the upstream pairwise matcher.
//!
//! Feature indices are not checked against any keypoint set: keeping them in
//! range is the caller's contract.

use crate::types::{DescriberType, FeatureIndex, ViewId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Correspondence between feature `i` of the first view and feature `j` of the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndMatch {
    pub i: FeatureIndex,
    pub j: FeatureIndex,
}

impl IndMatch {
    pub fn new(i: FeatureIndex, j: FeatureIndex) -> Self {
        Self { i, j }
    }
}

impl From<(FeatureIndex, FeatureIndex)> for IndMatch {
    fn from((i, j): (FeatureIndex, FeatureIndex)) -> Self {
        Self { i, j }
    }
}

/// Matches of one view pair, split by describer type.
pub type MatchesPerDescType = BTreeMap<DescriberType, Vec<IndMatch>>;

/// Ordered view pair `(I, J)`.
pub type ViewPair = (ViewId, ViewId);

/// All pairwise matches of a scene.
pub type PairwiseMatches = BTreeMap<ViewPair, MatchesPerDescType>;

/// Total number of individual correspondences.
pub fn match_count(matches: &PairwiseMatches) -> usize {
    matches
        .values()
        .flat_map(|per_type| per_type.values())
        .map(Vec::len)
        .sum()
}

/// Append `pairs` for `desc_type` to the matches of view pair `(view_i, view_j)`.
pub fn insert_matches<I>(
    matches: &mut PairwiseMatches,
    view_i: ViewId,
    view_j: ViewId,
    desc_type: DescriberType,
    pairs: I,
) where
    I: IntoIterator<Item = (FeatureIndex, FeatureIndex)>,
{
    matches
        .entry((view_i, view_j))
        .or_default()
        .entry(desc_type)
        .or_default()
        .extend(pairs.into_iter().map(IndMatch::from));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_matches_across_pairs_and_types() {
        let mut matches = PairwiseMatches::new();
        insert_matches(&mut matches, 0, 1, DescriberType::Sift, [(0, 1), (2, 3)]);
        insert_matches(&mut matches, 0, 1, DescriberType::Akaze, [(4, 4)]);
        insert_matches(&mut matches, 1, 2, DescriberType::Sift, [(1, 7)]);
        assert_eq!(match_count(&matches), 4);
        assert_eq!(matches.len(), 2);
    }
}
