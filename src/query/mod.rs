//! Read-only queries over exported tracks.
//!
//! Most queries come in two flavours: a naive one scanning the whole
//! [`TracksMap`], and a `_fast` one reading the per-view index built by
//! [`compute_tracks_per_view`]. The index must be rebuilt whenever the map
//! changes; both flavours return identical results on a current index.
//!
//! Unknown track ids and views are skipped rather than reported as errors.

use crate::matching::IndMatch;
use crate::types::{FeatureId, Track, TrackId, TracksMap, TracksPerView, ViewId};
use std::collections::{BTreeMap, BTreeSet};

/// Build the per-view index: for each view, the ascending ids of the tracks observing it.
pub fn compute_tracks_per_view(tracks: &TracksMap) -> TracksPerView {
    let mut per_view = TracksPerView::new();
    for (&id, track) in tracks {
        for &view in track.feat_per_view.keys() {
            per_view.entry(view).or_default().push(id);
        }
    }
    // Fast intersection queries rely on ascending lists.
    for ids in per_view.values_mut() {
        ids.sort_unstable();
        ids.dedup();
    }
    per_view
}

/// Ids of every track.
pub fn track_ids(tracks: &TracksMap) -> BTreeSet<TrackId> {
    tracks.keys().copied().collect()
}

/// Tracks observed in `view`, by scanning all tracks.
pub fn tracks_in_image(view: ViewId, tracks: &TracksMap) -> BTreeSet<TrackId> {
    tracks
        .iter()
        .filter(|(_, track)| track.is_visible_in(view))
        .map(|(&id, _)| id)
        .collect()
}

/// Tracks observed in at least one of `views`, by scanning all tracks.
pub fn tracks_in_images(views: &BTreeSet<ViewId>, tracks: &TracksMap) -> BTreeSet<TrackId> {
    tracks
        .iter()
        .filter(|(_, track)| views.iter().any(|&v| track.is_visible_in(v)))
        .map(|(&id, _)| id)
        .collect()
}

/// Tracks observed in `view`, from the per-view index.
pub fn tracks_in_image_fast(view: ViewId, tracks_per_view: &TracksPerView) -> BTreeSet<TrackId> {
    tracks_per_view
        .get(&view)
        .map(|ids| ids.iter().copied().collect())
        .unwrap_or_default()
}

/// Tracks observed in at least one of `views`, from the per-view index.
pub fn tracks_in_images_fast(
    views: &BTreeSet<ViewId>,
    tracks_per_view: &TracksPerView,
) -> BTreeSet<TrackId> {
    views
        .iter()
        .filter_map(|view| tracks_per_view.get(view))
        .flatten()
        .copied()
        .collect()
}

/// Tracks observed in every view of `views`, restricted to those views.
///
/// Scans all tracks. An empty view set yields no tracks.
pub fn common_tracks_in_images(views: &BTreeSet<ViewId>, tracks: &TracksMap) -> TracksMap {
    if views.is_empty() {
        return TracksMap::new();
    }
    tracks
        .iter()
        .filter_map(|(&id, track)| restrict_to_views(track, views).map(|t| (id, t)))
        .collect()
}

/// Ids of the tracks observed in every view of `views`, by scanning all tracks.
pub fn common_track_ids_in_images_naive(
    views: &BTreeSet<ViewId>,
    tracks: &TracksMap,
) -> BTreeSet<TrackId> {
    if views.is_empty() {
        return BTreeSet::new();
    }
    tracks
        .iter()
        .filter(|(_, track)| views.iter().all(|&v| track.is_visible_in(v)))
        .map(|(&id, _)| id)
        .collect()
}

/// Ids of the tracks observed in every view of `views`, from the per-view index.
///
/// Intersects the sorted per-view lists, starting from the shortest one. A view
/// missing from the index, or an empty view set, yields no tracks.
pub fn common_track_ids_in_images(
    views: &BTreeSet<ViewId>,
    tracks_per_view: &TracksPerView,
) -> BTreeSet<TrackId> {
    let mut lists = Vec::with_capacity(views.len());
    for view in views {
        match tracks_per_view.get(view) {
            Some(ids) => lists.push(ids.as_slice()),
            None => return BTreeSet::new(),
        }
    }
    lists.sort_by_key(|ids| ids.len());
    let Some((shortest, rest)) = lists.split_first() else {
        return BTreeSet::new();
    };
    let mut common = shortest.to_vec();
    for ids in rest {
        if common.is_empty() {
            break;
        }
        common = intersect_sorted(&common, ids);
    }
    common.into_iter().collect()
}

/// Tracks observed in every view of `views`, restricted to those views, using
/// the per-view index to find candidates.
pub fn common_tracks_in_images_fast(
    views: &BTreeSet<ViewId>,
    tracks: &TracksMap,
    tracks_per_view: &TracksPerView,
) -> TracksMap {
    common_track_ids_in_images(views, tracks_per_view)
        .into_iter()
        .filter_map(|id| {
            let track = tracks.get(&id)?;
            restrict_to_views(track, views).map(|t| (id, t))
        })
        .collect()
}

/// Number of tracks for each track length (distinct views).
pub fn track_length_histogram(tracks: &TracksMap) -> BTreeMap<usize, usize> {
    let mut histogram = BTreeMap::new();
    for track in tracks.values() {
        *histogram.entry(track.len()).or_insert(0) += 1;
    }
    histogram
}

/// Views observed by at least one track.
pub fn image_ids_in_tracks(tracks: &TracksMap) -> BTreeSet<ViewId> {
    tracks
        .values()
        .flat_map(|track| track.feat_per_view.keys().copied())
        .collect()
}

/// Views present in the per-view index.
pub fn image_ids_in_tracks_per_view(tracks_per_view: &TracksPerView) -> BTreeSet<ViewId> {
    tracks_per_view.keys().copied().collect()
}

/// Describer type and feature index observed in `view` for each of `track_ids`.
///
/// Follows the order of `track_ids`; tracks that are unknown or not visible in
/// `view` are skipped.
pub fn feature_id_in_view_per_track(
    tracks: &TracksMap,
    track_ids: &BTreeSet<TrackId>,
    view: ViewId,
) -> Vec<FeatureId> {
    track_ids
        .iter()
        .filter_map(|id| tracks.get(id))
        .filter_map(|track| {
            track
                .feature_in_view(view)
                .map(|feat| (track.desc_type, feat))
        })
        .collect()
}

/// Convert two-view tracks into indexed matches `(feature in lower view, feature in higher view)`.
///
/// Follows the order of `track_ids`; unknown ids are skipped.
///
/// # Panics
///
/// Panics if a referenced track does not have exactly two observations: this
/// conversion is only meaningful for tracks built from a single view pair.
pub fn tracks_to_indexed_matches(tracks: &TracksMap, track_ids: &[TrackId]) -> Vec<IndMatch> {
    let mut matches = Vec::with_capacity(track_ids.len());
    for id in track_ids {
        let Some(track) = tracks.get(id) else {
            continue;
        };
        let mut observations = track.feat_per_view.values();
        match (observations.next(), observations.next(), observations.next()) {
            (Some(&i), Some(&j), None) => matches.push(IndMatch::new(i, j)),
            _ => panic!(
                "track {id} has {} observations, two-view conversion needs exactly 2",
                track.len()
            ),
        }
    }
    matches
}

fn restrict_to_views(track: &Track, views: &BTreeSet<ViewId>) -> Option<Track> {
    let mut restricted = Track::new(track.desc_type);
    for &view in views {
        let feat = track.feature_in_view(view)?;
        restricted.feat_per_view.insert(view, feat);
    }
    Some(restricted)
}

/// Intersection of two ascending slices.
fn intersect_sorted(a: &[TrackId], b: &[TrackId]) -> Vec<TrackId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
