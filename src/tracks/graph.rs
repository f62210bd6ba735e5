use super::export::{self, ComponentFilter};
use super::filter::{self, FilterOptions, FilteredGraph};
use super::union_find::UnionFind;
use super::TrackError;
use crate::matching::PairwiseMatches;
use crate::types::{DescriberType, FeatureIndex, KeypointId, TracksMap, ViewId};
use log::debug;
use std::collections::HashMap;

/// One detected feature in one view; the identity of a graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Observation {
    pub view: ViewId,
    pub keypoint: KeypointId,
}

impl Observation {
    pub fn new(view: ViewId, desc_type: DescriberType, feat_index: FeatureIndex) -> Self {
        Self {
            view,
            keypoint: KeypointId::new(desc_type, feat_index),
        }
    }
}

/// Connected components of the correspondence graph.
///
/// Every distinct observation referenced by a match is one node; every match
/// unites its two nodes. Components are candidate tracks. Nothing is removed
/// here, see [`CorrespondenceGraph::filter`].
#[derive(Clone, Debug)]
pub struct CorrespondenceGraph {
    nodes: Vec<Observation>,
    index: HashMap<Observation, usize>,
    components: Vec<Vec<usize>>,
    component_of_node: Vec<usize>,
    match_count: usize,
}

impl CorrespondenceGraph {
    /// Fuse all pairwise matches.
    ///
    /// Single-threaded; near-linear in the number of matches. Node ids follow
    /// the order in which observations are first met while walking `matches`,
    /// and components are ordered by their first node.
    pub fn build(matches: &PairwiseMatches) -> Self {
        let mut builder = GraphBuilder::default();
        for (&(view_i, view_j), per_type) in matches {
            for (&desc_type, pairs) in per_type {
                for m in pairs {
                    let a = builder.node(Observation::new(view_i, desc_type, m.i));
                    let b = builder.node(Observation::new(view_j, desc_type, m.j));
                    builder.uf.union(a, b);
                    builder.match_count += 1;
                }
            }
        }
        builder.finish()
    }

    /// Number of distinct observations.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of correspondences fused into the graph.
    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// Number of connected components (candidate tracks).
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component index of `observation`, if it appeared in any match.
    pub fn component_of(&self, observation: &Observation) -> Option<usize> {
        self.index
            .get(observation)
            .map(|&node| self.component_of_node[node])
    }

    /// Observations of component `component`, in node order.
    pub fn component_observations(
        &self,
        component: usize,
    ) -> impl Iterator<Item = &Observation> + '_ {
        self.components
            .get(component)
            .into_iter()
            .flatten()
            .map(move |&node| &self.nodes[node])
    }

    /// Graph over explicit observation pairs, bypassing the per-type grouping
    /// of [`PairwiseMatches`].
    #[cfg(test)]
    pub(crate) fn from_observation_pairs(pairs: &[(Observation, Observation)]) -> Self {
        let mut builder = GraphBuilder::default();
        for &(a, b) in pairs {
            let a = builder.node(a);
            let b = builder.node(b);
            builder.uf.union(a, b);
            builder.match_count += 1;
        }
        builder.finish()
    }

    pub(crate) fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    pub(crate) fn nodes(&self) -> &[Observation] {
        &self.nodes
    }

    /// Discard components that cannot be valid tracks.
    pub fn filter(self, options: &FilterOptions) -> FilteredGraph {
        filter::filter_graph(self, options)
    }

    /// Export every component as a track, without filtering.
    ///
    /// Components holding several observations of one view keep only the
    /// first one per view in node order.
    pub fn export(&self) -> Result<TracksMap, TrackError> {
        export::export_components(self, ComponentFilter::All)
    }
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<Observation>,
    index: HashMap<Observation, usize>,
    uf: UnionFind,
    match_count: usize,
}

impl GraphBuilder {
    fn node(&mut self, observation: Observation) -> usize {
        if let Some(&id) = self.index.get(&observation) {
            return id;
        }
        let id = self.uf.make_set();
        debug_assert_eq!(id, self.nodes.len());
        self.nodes.push(observation);
        self.index.insert(observation, id);
        id
    }

    fn finish(mut self) -> CorrespondenceGraph {
        let components = self.uf.components();
        debug_assert_eq!(components.len(), self.uf.set_count());
        let mut component_of_node = vec![0usize; self.nodes.len()];
        for (c, members) in components.iter().enumerate() {
            for &node in members {
                component_of_node[node] = c;
            }
        }
        debug!(
            "CorrespondenceGraph::build matches={} nodes={} components={}",
            self.match_count,
            self.nodes.len(),
            components.len()
        );
        CorrespondenceGraph {
            nodes: self.nodes,
            index: self.index,
            components,
            component_of_node,
            match_count: self.match_count,
        }
    }
}
