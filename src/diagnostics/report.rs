use super::timing::TimingBreakdown;
use crate::tracks::FilterSummary;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one run of the track pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBuildReport {
    /// Correspondences fused into the graph.
    pub match_count: usize,
    /// Distinct observations (graph nodes).
    pub node_count: usize,
    pub component_count: usize,
    pub kept: usize,
    pub discarded_forks: usize,
    pub discarded_short: usize,
    pub track_count: usize,
    pub filter_partitions: usize,
    pub parallel_filter: bool,
    /// Number of tracks per length (distinct views).
    pub length_histogram: BTreeMap<usize, usize>,
    pub timing: TimingBreakdown,
}

impl TrackBuildReport {
    pub(crate) fn apply_filter_summary(&mut self, summary: &FilterSummary) {
        self.component_count = summary.components;
        self.kept = summary.kept;
        self.discarded_forks = summary.discarded_forks;
        self.discarded_short = summary.discarded_short;
        self.filter_partitions = summary.partitions;
        self.parallel_filter = summary.parallel;
    }
}
