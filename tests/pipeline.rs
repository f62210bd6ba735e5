mod common;

use common::synthetic_matches::{add_fork, observing_views, scene_matches};
use feature_tracks::matching::insert_matches;
use feature_tracks::query::{compute_tracks_per_view, track_length_histogram};
use feature_tracks::tracks::{
    tracks_to_text, CorrespondenceGraph, FilterOptions, Observation, ParallelFilterOptions,
};
use feature_tracks::{DescriberType, TracksBuilder, TracksMap};
use std::collections::BTreeSet;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn synthetic_scene_recovers_every_point() {
    init_logger();
    let (matches, truth) = scene_matches(200, 6);
    let build = TracksBuilder::new(FilterOptions::new(true, 1))
        .run(&matches)
        .expect("uniform describer types");

    let mut recovered: Vec<_> = build.tracks.values().map(|t| t.feat_per_view.clone()).collect();
    let mut expected = truth.clone();
    recovered.sort();
    expected.sort();
    assert_eq!(recovered, expected);
    assert_eq!(build.report.discarded_forks, 0);
}

#[test]
fn matched_observations_share_a_track() {
    let (matches, _) = scene_matches(60, 5);
    let graph = CorrespondenceGraph::build(&matches);
    for (&(vi, vj), per_type) in &matches {
        for (&desc_type, pairs) in per_type {
            for m in pairs {
                let a = graph.component_of(&Observation::new(vi, desc_type, m.i));
                let b = graph.component_of(&Observation::new(vj, desc_type, m.j));
                assert!(a.is_some());
                assert_eq!(a, b, "match {vi}:{} <-> {vj}:{}", m.i, m.j);
            }
        }
    }

    let tracks = graph.export().expect("uniform describer types");
    for (&(vi, vj), per_type) in &matches {
        for m in &per_type[&DescriberType::Sift] {
            let shared = tracks.values().any(|t| {
                t.feature_in_view(vi) == Some(m.i) && t.feature_in_view(vj) == Some(m.j)
            });
            assert!(shared, "match {vi}:{} <-> {vj}:{} split", m.i, m.j);
        }
    }
}

#[test]
fn forked_points_are_removed_and_others_survive() {
    init_logger();
    let views = 5;
    let (mut matches, truth) = scene_matches(120, views);
    let mut forked = BTreeSet::new();
    for p in (0..120).step_by(9) {
        let seen = observing_views(p, views);
        if seen.len() >= 2 {
            add_fork(&mut matches, p, seen[0], seen[1]);
            forked.insert(p);
        }
    }

    let build = TracksBuilder::new(FilterOptions::new(true, 2))
        .run(&matches)
        .expect("uniform describer types");
    assert_eq!(build.report.discarded_forks, forked.len());

    let surviving: BTreeSet<_> = build.tracks.values().map(|t| t.feat_per_view.clone()).collect();
    for (p, obs) in truth.iter().enumerate() {
        let expected = !forked.contains(&p) && obs.len() >= 2;
        assert_eq!(surviving.contains(obs), expected, "point {p}");
    }
}

#[test]
fn filtering_is_identical_for_any_worker_count() {
    let views = 7;
    let (mut matches, _) = scene_matches(500, views);
    for p in (0..500).step_by(13) {
        add_fork(&mut matches, p, 0, 3);
    }
    let graph = CorrespondenceGraph::build(&matches);
    let reference = graph
        .clone()
        .filter(&FilterOptions::new(true, 3).with_parallel(ParallelFilterOptions::disabled()));
    let reference_tracks = reference.export().expect("uniform describer types");

    for workers in [0, 1, 2, 4, 5, 8, 33] {
        let parallel = ParallelFilterOptions::new(true, workers, 1);
        let filtered = graph
            .clone()
            .filter(&FilterOptions::new(true, 3).with_parallel(parallel));
        assert_eq!(filtered.discarded_components(), reference.discarded_components());
        assert_eq!(filtered.summary().kept, reference.summary().kept);
        let tracks = filtered.export().expect("uniform describer types");
        assert_eq!(tracks, reference_tracks, "workers={workers}");
        assert_eq!(tracks_to_text(&tracks), tracks_to_text(&reference_tracks));
    }
}

#[test]
fn unreachable_minimum_length_yields_empty_map() {
    let (matches, _) = scene_matches(40, 4);
    let build = TracksBuilder::new(FilterOptions::new(true, 5))
        .run(&matches)
        .expect("uniform describer types");
    assert!(build.tracks.is_empty());
    assert_eq!(build.report.discarded_short, build.report.component_count);
    assert!(track_length_histogram(&build.tracks).is_empty());
}

#[test]
fn per_view_index_is_a_bijection_with_the_map() {
    let (matches, _) = scene_matches(150, 6);
    let build = TracksBuilder::new(FilterOptions::default())
        .run(&matches)
        .expect("uniform describer types");
    let per_view = compute_tracks_per_view(&build.tracks);

    for (id, track) in &build.tracks {
        for view in track.feat_per_view.keys() {
            assert!(per_view[view].binary_search(id).is_ok());
        }
    }
    for (view, ids) in &per_view {
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        for id in ids {
            assert!(build.tracks[id].is_visible_in(*view));
        }
    }
}

#[test]
fn track_ids_are_dense_and_follow_input_order() {
    let mut matches = feature_tracks::PairwiseMatches::new();
    insert_matches(&mut matches, 0, 1, DescriberType::Sift, [(5, 5), (1, 1)]);
    let tracks: TracksMap = CorrespondenceGraph::build(&matches)
        .filter(&FilterOptions::new(true, 2))
        .export()
        .expect("uniform describer types");
    let firsts: Vec<_> = tracks
        .iter()
        .map(|(id, t)| (id.0, t.feature_in_view(0)))
        .collect();
    assert_eq!(firsts, vec![(0, Some(5)), (1, Some(1))]);
}
