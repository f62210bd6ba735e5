//! Fusion of pairwise feature matches into multi-view tracks.
//!
//! The pipeline follows "Unordered feature tracking made fast and easy"
//! (Moulon & Monasse, CVMP 2012):
//!
//! - Build: every distinct `(view, describer type, feature index)` observation
//!   becomes a node of a union-find forest, and every match unites its two
//!   endpoints. Connected components are candidate tracks.
//! - Filter: components seen twice in one view (forks) or spanning too few
//!   views are discarded. Decisions are independent per component and may be
//!   computed in parallel partitions; the result does not depend on the
//!   partitioning.
//! - Export: surviving components become a [`TracksMap`] keyed by [`TrackId`].
//!
//! Each stage consumes or borrows the previous one, so stages cannot run out
//! of order:
//!
//! ```
//! use feature_tracks::matching::{insert_matches, PairwiseMatches};
//! use feature_tracks::tracks::{CorrespondenceGraph, FilterOptions};
//! use feature_tracks::types::DescriberType;
//!
//! let mut matches = PairwiseMatches::new();
//! insert_matches(&mut matches, 0, 1, DescriberType::Sift, [(0, 1)]);
//! insert_matches(&mut matches, 1, 2, DescriberType::Sift, [(1, 2)]);
//!
//! let graph = CorrespondenceGraph::build(&matches);
//! let filtered = graph.filter(&FilterOptions::new(true, 2));
//! let tracks = filtered.export().unwrap();
//! assert_eq!(tracks.len(), 1);
//! ```
//!
//! Feature indices are never validated against keypoint sets.
//!
//! [`TracksMap`]: crate::types::TracksMap
//! [`TrackId`]: crate::types::TrackId

mod export;
mod filter;
mod graph;
mod union_find;

pub use export::{tracks_to_text, write_tracks_text};
pub use filter::{FilterOptions, FilterSummary, FilteredGraph, ParallelFilterOptions, Rejection};
pub use graph::{CorrespondenceGraph, Observation};

use crate::diagnostics::TrackBuildReport;
use crate::matching::PairwiseMatches;
use crate::query::track_length_histogram;
use crate::types::{DescriberType, TracksMap};
use log::debug;
use thiserror::Error;

/// Failures of the track pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Observations of one component were produced by different describers.
    #[error("component {component} mixes describer types ({first} and {other})")]
    MixedDescriberTypes {
        component: usize,
        first: DescriberType,
        other: DescriberType,
    },
}

/// Tracks produced by [`TracksBuilder::run`] with the run report.
#[derive(Clone, Debug)]
pub struct TracksBuild {
    pub tracks: TracksMap,
    pub report: TrackBuildReport,
}

/// Runs build, filter, and export with fixed filter options.
#[derive(Clone, Debug, Default)]
pub struct TracksBuilder {
    options: FilterOptions,
}

impl TracksBuilder {
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Build tracks from `matches` and report counts and stage timings.
    pub fn run(&self, matches: &PairwiseMatches) -> Result<TracksBuild, TrackError> {
        let mut report = TrackBuildReport::default();

        let graph = report
            .timing
            .time("build", || CorrespondenceGraph::build(matches));
        report.match_count = graph.match_count();
        report.node_count = graph.node_count();

        let filtered = report.timing.time("filter", || graph.filter(&self.options));
        report.apply_filter_summary(filtered.summary());

        let tracks = report.timing.time("export", || filtered.export())?;
        report.track_count = tracks.len();
        report.length_histogram = track_length_histogram(&tracks);

        debug!(
            "TracksBuilder::run tracks={} total_ms={:.3}",
            report.track_count, report.timing.total_ms
        );
        Ok(TracksBuild { tracks, report })
    }
}

/// Build, filter, and export in one call.
pub fn build_tracks(
    matches: &PairwiseMatches,
    options: &FilterOptions,
) -> Result<(TracksMap, TrackBuildReport), TrackError> {
    let TracksBuild { tracks, report } = TracksBuilder::new(*options).run(matches)?;
    Ok((tracks, report))
}
