use feature_tracks::matching::{IndMatch, PairwiseMatches};
use feature_tracks::query::{
    common_track_ids_in_images, common_track_ids_in_images_naive, common_tracks_in_images,
    common_tracks_in_images_fast, compute_tracks_per_view, image_ids_in_tracks,
    image_ids_in_tracks_per_view, tracks_in_images, tracks_in_images_fast,
};
use feature_tracks::tracks::{CorrespondenceGraph, FilterOptions, ParallelFilterOptions};
use feature_tracks::{DescriberType, Track, TrackId, TracksMap, ViewId};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn arb_tracks() -> impl Strategy<Value = TracksMap> {
    let track = (
        prop_oneof![Just(DescriberType::Sift), Just(DescriberType::Akaze)],
        prop::collection::btree_map(0u32..6, 0usize..50, 1..5),
    )
        .prop_map(|(desc_type, feat_per_view)| Track {
            desc_type,
            feat_per_view,
        });
    prop::collection::vec((0usize..1000, track), 0..40).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, t)| (TrackId(id), t))
            .collect()
    })
}

fn arb_views() -> impl Strategy<Value = BTreeSet<ViewId>> {
    prop::collection::btree_set(0u32..7, 0..4)
}

fn arb_matches() -> impl Strategy<Value = PairwiseMatches> {
    prop::collection::vec(((0u32..5, 0u32..5), 0usize..12, 0usize..12), 0..60).prop_map(
        |entries| {
            let mut matches = PairwiseMatches::new();
            for ((vi, vj), i, j) in entries {
                matches
                    .entry((vi, vj))
                    .or_insert_with(BTreeMap::new)
                    .entry(DescriberType::Sift)
                    .or_insert_with(Vec::new)
                    .push(IndMatch::new(i, j));
            }
            matches
        },
    )
}

proptest! {
    #[test]
    fn common_tracks_naive_and_fast_agree(tracks in arb_tracks(), views in arb_views()) {
        let per_view = compute_tracks_per_view(&tracks);
        prop_assert_eq!(
            common_track_ids_in_images_naive(&views, &tracks),
            common_track_ids_in_images(&views, &per_view)
        );
        prop_assert_eq!(
            common_tracks_in_images(&views, &tracks),
            common_tracks_in_images_fast(&views, &tracks, &per_view)
        );
    }

    #[test]
    fn visible_tracks_naive_and_fast_agree(tracks in arb_tracks(), views in arb_views()) {
        let per_view = compute_tracks_per_view(&tracks);
        prop_assert_eq!(
            tracks_in_images(&views, &tracks),
            tracks_in_images_fast(&views, &per_view)
        );
        prop_assert_eq!(image_ids_in_tracks(&tracks), image_ids_in_tracks_per_view(&per_view));
    }

    #[test]
    fn filtered_tracks_satisfy_invariants(
        matches in arb_matches(),
        min_len in 1usize..4,
        workers in 1usize..9,
    ) {
        let graph = CorrespondenceGraph::build(&matches);
        let sequential = graph
            .clone()
            .filter(&FilterOptions::new(true, min_len).with_parallel(ParallelFilterOptions::disabled()));
        let parallel = graph
            .filter(&FilterOptions::new(true, min_len)
                .with_parallel(ParallelFilterOptions::new(true, workers, 1)));
        prop_assert_eq!(sequential.discarded_components(), parallel.discarded_components());

        let tracks = parallel.export().unwrap();
        prop_assert_eq!(&tracks, &sequential.export().unwrap());
        for track in tracks.values() {
            prop_assert!(track.len() >= min_len);
        }
        // Ids are dense in export order.
        for (expected, id) in tracks.keys().enumerate() {
            prop_assert_eq!(id.0, expected);
        }
    }
}
