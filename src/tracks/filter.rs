//! Removal of candidate components that cannot be valid tracks.
//!
//! A component is discarded when
//! - `clear_forks` is set and two of its observations share a view (a chain of
//!   matches fused two distinct points), or
//! - it spans fewer than `min_track_length` distinct views.
//!
//! Decisions only read the observations of the component being judged, so the
//! component list is split into contiguous partitions that are scanned
//! independently (with Rayon when enabled). Each partition yields a private
//! discard list; lists are concatenated in partition order and applied once.
//! The outcome does not depend on the partition count or on scheduling.

use super::export::{self, ComponentFilter};
use super::graph::{CorrespondenceGraph, Observation};
use super::TrackError;
use crate::types::{TracksMap, ViewId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::ops::Range;

/// Controls whether component filtering runs sequentially or with Rayon.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelFilterOptions {
    enabled: bool,
    workers: usize,
    min_components_for_parallel: usize,
}

impl ParallelFilterOptions {
    /// Construct explicit options. `workers == 0` uses one partition per Rayon thread.
    pub fn new(enabled: bool, workers: usize, min_components_for_parallel: usize) -> Self {
        Self {
            enabled,
            workers,
            min_components_for_parallel: min_components_for_parallel.max(1),
        }
    }

    /// Disable parallel filtering regardless of component count.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            workers: 1,
            min_components_for_parallel: usize::MAX,
        }
    }

    /// Returns true when parallel filtering should be used for `component_count`.
    pub fn should_parallelize(&self, component_count: usize) -> bool {
        self.enabled && component_count >= self.min_components_for_parallel
    }

    /// Fix the number of partitions the components are split into.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Update the minimum component threshold for parallel filtering.
    pub fn with_min_components(mut self, min_components: usize) -> Self {
        self.min_components_for_parallel = min_components.max(1);
        self
    }

    fn partition_count(&self, component_count: usize) -> usize {
        if !self.should_parallelize(component_count) && self.workers == 0 {
            return 1;
        }
        let workers = if self.workers == 0 {
            available_workers()
        } else {
            self.workers
        };
        workers.clamp(1, component_count.max(1))
    }
}

impl Default for ParallelFilterOptions {
    fn default() -> Self {
        Self {
            enabled: cfg!(feature = "parallel"),
            workers: 0,
            min_components_for_parallel: 4096,
        }
    }
}

#[cfg(feature = "parallel")]
fn available_workers() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn available_workers() -> usize {
    1
}

/// Parameters of the track filter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Discard components with several observations in one view.
    pub clear_forks: bool,
    /// Minimum number of distinct views a track must span (at least 1).
    pub min_track_length: usize,
    pub parallel: ParallelFilterOptions,
}

impl FilterOptions {
    pub fn new(clear_forks: bool, min_track_length: usize) -> Self {
        Self {
            clear_forks,
            min_track_length: min_track_length.max(1),
            ..Default::default()
        }
    }

    pub fn with_parallel(mut self, parallel: ParallelFilterOptions) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            clear_forks: true,
            min_track_length: 2,
            parallel: ParallelFilterOptions::default(),
        }
    }
}

/// Reason a component was discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Several observations in one view.
    Fork,
    /// Fewer distinct views than the configured minimum.
    TooShort,
}

/// Counters of one filtering pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub components: usize,
    pub kept: usize,
    pub discarded_forks: usize,
    pub discarded_short: usize,
    pub partitions: usize,
    pub parallel: bool,
}

/// Correspondence graph with discard decisions applied.
#[derive(Clone, Debug)]
pub struct FilteredGraph {
    graph: CorrespondenceGraph,
    discarded: Vec<bool>,
    summary: FilterSummary,
}

impl FilteredGraph {
    pub fn graph(&self) -> &CorrespondenceGraph {
        &self.graph
    }

    pub fn summary(&self) -> &FilterSummary {
        &self.summary
    }

    pub fn kept_count(&self) -> usize {
        self.summary.kept
    }

    pub fn discarded_count(&self) -> usize {
        self.summary.discarded_forks + self.summary.discarded_short
    }

    pub fn is_discarded(&self, component: usize) -> bool {
        self.discarded.get(component).copied().unwrap_or(false)
    }

    /// Ascending indices of discarded components.
    pub fn discarded_components(&self) -> Vec<usize> {
        self.discarded
            .iter()
            .enumerate()
            .filter_map(|(c, &d)| d.then_some(c))
            .collect()
    }

    /// Export the surviving components as tracks, with ids assigned in component order.
    pub fn export(&self) -> Result<TracksMap, TrackError> {
        export::export_components(&self.graph, ComponentFilter::Surviving(&self.discarded))
    }

    /// Export the surviving tracks and write them in the diagnostic text format.
    pub fn export_to_writer<W: Write>(&self, writer: W) -> io::Result<()> {
        let tracks = self
            .export()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        export::write_tracks_text(&tracks, writer)
    }
}

/// Private result of scanning one partition of components.
#[derive(Debug, Default)]
struct PartitionVerdict {
    discarded: Vec<usize>,
    forks: usize,
    short: usize,
}

pub(crate) fn filter_graph(graph: CorrespondenceGraph, options: &FilterOptions) -> FilteredGraph {
    let component_count = graph.component_count();
    let min_len = options.min_track_length.max(1);
    let partitions = split_ranges(
        component_count,
        options.parallel.partition_count(component_count),
    );
    let parallel = options.parallel.should_parallelize(component_count) && partitions.len() > 1;

    let verdicts = scan_partitions(&graph, &partitions, options.clear_forks, min_len, parallel);

    let mut discarded = vec![false; component_count];
    let mut forks = 0usize;
    let mut short = 0usize;
    for verdict in verdicts {
        forks += verdict.forks;
        short += verdict.short;
        for c in verdict.discarded {
            discarded[c] = true;
        }
    }

    let summary = FilterSummary {
        components: component_count,
        kept: component_count - forks - short,
        discarded_forks: forks,
        discarded_short: short,
        partitions: partitions.len(),
        parallel,
    };
    debug!(
        "CorrespondenceGraph::filter clear_forks={} min_len={} components={} kept={} forks={} short={} partitions={} parallel={}",
        options.clear_forks,
        min_len,
        component_count,
        summary.kept,
        forks,
        short,
        summary.partitions,
        parallel
    );
    if component_count > 0 && summary.kept == 0 {
        warn!("Track filter discarded all {component_count} components");
    }

    FilteredGraph {
        graph,
        discarded,
        summary,
    }
}

fn scan_partitions(
    graph: &CorrespondenceGraph,
    partitions: &[Range<usize>],
    clear_forks: bool,
    min_len: usize,
    parallel: bool,
) -> Vec<PartitionVerdict> {
    if parallel {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return partitions
                .par_iter()
                .map(|range| scan_partition(graph, range.clone(), clear_forks, min_len))
                .collect();
        }
    }
    partitions
        .iter()
        .map(|range| scan_partition(graph, range.clone(), clear_forks, min_len))
        .collect()
}

fn scan_partition(
    graph: &CorrespondenceGraph,
    range: Range<usize>,
    clear_forks: bool,
    min_len: usize,
) -> PartitionVerdict {
    let nodes = graph.nodes();
    let components = graph.components();
    let mut verdict = PartitionVerdict::default();
    let mut views: Vec<ViewId> = Vec::new();
    for c in range {
        let members = components[c].iter().map(|&n| &nodes[n]);
        match classify(members, clear_forks, min_len, &mut views) {
            None => {}
            Some(Rejection::Fork) => {
                verdict.forks += 1;
                verdict.discarded.push(c);
            }
            Some(Rejection::TooShort) => {
                verdict.short += 1;
                verdict.discarded.push(c);
            }
        }
    }
    verdict
}

/// Judge one component; `views` is scratch space reused across calls.
fn classify<'a>(
    members: impl Iterator<Item = &'a Observation>,
    clear_forks: bool,
    min_len: usize,
    views: &mut Vec<ViewId>,
) -> Option<Rejection> {
    views.clear();
    views.extend(members.map(|o| o.view));
    let observations = views.len();
    views.sort_unstable();
    views.dedup();
    if clear_forks && views.len() != observations {
        Some(Rejection::Fork)
    } else if views.len() < min_len {
        Some(Rejection::TooShort)
    } else {
        None
    }
}

/// Split `0..len` into `parts` contiguous ranges whose sizes differ by at most one.
fn split_ranges(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let parts = parts.clamp(1, len);
    let base = len / parts;
    let extra = len % parts;
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for p in 0..parts {
        let size = base + usize::from(p < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}
