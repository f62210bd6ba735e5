#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagnostics;
pub mod io;
pub mod matching;
pub mod query;
pub mod tracks;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::diagnostics::TrackBuildReport;
pub use crate::matching::{IndMatch, PairwiseMatches};
pub use crate::tracks::{
    build_tracks, CorrespondenceGraph, FilterOptions, FilteredGraph, TrackError, TracksBuild,
    TracksBuilder,
};
pub use crate::types::{DescriberType, Track, TrackId, TracksMap, TracksPerView, ViewId};

/// Small prelude for quick experiments.
///
/// ```
/// use feature_tracks::prelude::*;
///
/// let mut matches = PairwiseMatches::new();
/// insert_matches(&mut matches, 0, 1, DescriberType::Sift, [(3, 8)]);
///
/// let (tracks, report) = build_tracks(&matches, &FilterOptions::default()).unwrap();
/// let per_view = compute_tracks_per_view(&tracks);
/// println!("tracks={} views={}", report.track_count, per_view.len());
/// ```
pub mod prelude {
    pub use crate::matching::insert_matches;
    pub use crate::query::compute_tracks_per_view;
    pub use crate::{
        build_tracks, DescriberType, FilterOptions, PairwiseMatches, TrackId, TracksMap,
    };
}
