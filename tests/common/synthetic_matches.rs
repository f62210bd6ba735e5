use feature_tracks::matching::{insert_matches, PairwiseMatches};
use feature_tracks::types::{DescriberType, ViewId};
use std::collections::BTreeMap;

/// Ground truth of one synthetic 3D point: observed feature per view.
pub type PointObservations = BTreeMap<ViewId, usize>;

/// Feature index of `point` in `view`; unique within a view.
pub fn feature_of(point: usize, view: ViewId) -> usize {
    point * 16 + view as usize
}

/// Views observing `point` in a scene of `views` views.
///
/// Every point is seen by a deterministic subset of at least one view.
pub fn observing_views(point: usize, views: ViewId) -> Vec<ViewId> {
    assert!(views > 0, "scene needs at least one view");
    let seen: Vec<ViewId> = (0..views)
        .filter(|&v| (point + v as usize * 3) % 4 != 0)
        .collect();
    if seen.is_empty() {
        vec![(point % views as usize) as ViewId]
    } else {
        seen
    }
}

/// Exhaustive pairwise matches of `points` points over `views` views.
pub fn scene_matches(points: usize, views: ViewId) -> (PairwiseMatches, Vec<PointObservations>) {
    let mut matches = PairwiseMatches::new();
    let mut truth = Vec::with_capacity(points);
    for p in 0..points {
        let seen = observing_views(p, views);
        for (a, &vi) in seen.iter().enumerate() {
            for &vj in &seen[a + 1..] {
                insert_matches(
                    &mut matches,
                    vi,
                    vj,
                    DescriberType::Sift,
                    [(feature_of(p, vi), feature_of(p, vj))],
                );
            }
        }
        truth.push(seen.iter().map(|&v| (v, feature_of(p, v))).collect());
    }
    (matches, truth)
}

/// Add a spurious match from a fresh feature of `view` to the observation of
/// `point` in `other`, creating a fork in `view` when `point` is seen there.
pub fn add_fork(matches: &mut PairwiseMatches, point: usize, view: ViewId, other: ViewId) {
    let spurious = 1_000_000 + point;
    insert_matches(
        matches,
        view,
        other,
        DescriberType::Sift,
        [(spurious, feature_of(point, other))],
    );
}
