use super::graph::CorrespondenceGraph;
use super::TrackError;
use crate::types::{Track, TrackId, TracksMap};
use std::io::{self, Write};

/// Which components of a graph become tracks.
#[derive(Clone, Copy, Debug)]
pub(crate) enum ComponentFilter<'a> {
    All,
    /// Components flagged `true` are skipped.
    Surviving(&'a [bool]),
}

impl ComponentFilter<'_> {
    fn keeps(&self, component: usize) -> bool {
        match self {
            ComponentFilter::All => true,
            ComponentFilter::Surviving(discarded) => {
                !discarded.get(component).copied().unwrap_or(false)
            }
        }
    }
}

/// Materialize kept components as tracks; ids are assigned 0, 1, 2, ... in
/// component order.
///
/// Fails when a component mixes describer types. When a component holds
/// several observations of one view (only possible without fork clearing),
/// the first observation in node order is kept.
pub(crate) fn export_components(
    graph: &CorrespondenceGraph,
    filter: ComponentFilter<'_>,
) -> Result<TracksMap, TrackError> {
    let mut tracks = TracksMap::new();
    let mut next_id = 0usize;
    for component in 0..graph.component_count() {
        if !filter.keeps(component) {
            continue;
        }
        let mut observations = graph.component_observations(component);
        let Some(first) = observations.next() else {
            continue;
        };
        let mut track = Track::new(first.keypoint.desc_type);
        track
            .feat_per_view
            .insert(first.view, first.keypoint.feat_index);
        for obs in observations {
            if obs.keypoint.desc_type != track.desc_type {
                return Err(TrackError::MixedDescriberTypes {
                    component,
                    first: track.desc_type,
                    other: obs.keypoint.desc_type,
                });
            }
            track
                .feat_per_view
                .entry(obs.view)
                .or_insert(obs.keypoint.feat_index);
        }
        tracks.insert(TrackId(next_id), track);
        next_id += 1;
    }
    Ok(tracks)
}

/// Write tracks in a line-oriented text format, ordered by track id:
///
/// ```text
/// Track: 0
///     length: 3
/// 0 sift 12
/// 1 sift 40
/// 2 sift 7
/// ```
///
/// Observations are listed by ascending view id (`<view> <describer> <feature>`).
pub fn write_tracks_text<W: Write>(tracks: &TracksMap, mut writer: W) -> io::Result<()> {
    for (id, track) in tracks {
        writeln!(writer, "Track: {id}")?;
        writeln!(writer, "\tlength: {}", track.len())?;
        for (view, feat) in &track.feat_per_view {
            writeln!(writer, "{view} {} {feat}", track.desc_type)?;
        }
    }
    writer.flush()
}

/// Text export as an owned string.
pub fn tracks_to_text(tracks: &TracksMap) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_tracks_text(tracks, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}
