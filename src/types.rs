use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a view (one image of the dataset).
pub type ViewId = u32;

/// Index of a detected feature inside the keypoint set of one view.
pub type FeatureIndex = usize;

/// Opaque handle of an exported track.
///
/// Ids are unique within one [`TracksMap`] and carry no meaning beyond identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feature extraction algorithm that produced an observation.
///
/// Feature indices are only comparable within one describer type, so every
/// observation carries it alongside its index.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DescriberType {
    #[default]
    Unknown,
    Sift,
    SiftFloat,
    SiftUpright,
    DspSift,
    Akaze,
    AkazeLiop,
    AkazeMldb,
    Cctag3,
    Cctag4,
    SiftOcv,
    AkazeOcv,
    Apriltag16h5,
}

impl DescriberType {
    pub const ALL: [DescriberType; 13] = [
        DescriberType::Unknown,
        DescriberType::Sift,
        DescriberType::SiftFloat,
        DescriberType::SiftUpright,
        DescriberType::DspSift,
        DescriberType::Akaze,
        DescriberType::AkazeLiop,
        DescriberType::AkazeMldb,
        DescriberType::Cctag3,
        DescriberType::Cctag4,
        DescriberType::SiftOcv,
        DescriberType::AkazeOcv,
        DescriberType::Apriltag16h5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DescriberType::Unknown => "unknown",
            DescriberType::Sift => "sift",
            DescriberType::SiftFloat => "sift_float",
            DescriberType::SiftUpright => "sift_upright",
            DescriberType::DspSift => "dsp_sift",
            DescriberType::Akaze => "akaze",
            DescriberType::AkazeLiop => "akaze_liop",
            DescriberType::AkazeMldb => "akaze_mldb",
            DescriberType::Cctag3 => "cctag3",
            DescriberType::Cctag4 => "cctag4",
            DescriberType::SiftOcv => "sift_ocv",
            DescriberType::AkazeOcv => "akaze_ocv",
            DescriberType::Apriltag16h5 => "apriltag16h5",
        }
    }
}

impl fmt::Display for DescriberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriberType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DescriberType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| format!("unknown describer type '{s}'"))
    }
}

/// Unique id of a feature inside one view: describer type plus feature index.
///
/// Ordered by describer type first, then by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeypointId {
    pub desc_type: DescriberType,
    pub feat_index: FeatureIndex,
}

impl KeypointId {
    pub fn new(desc_type: DescriberType, feat_index: FeatureIndex) -> Self {
        Self {
            desc_type,
            feat_index,
        }
    }
}

impl fmt::Display for KeypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.desc_type, self.feat_index)
    }
}

/// A feature observed across several views, believed to image one 3D point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Describer type shared by every observation of the track.
    pub desc_type: DescriberType,
    /// Observed feature per view.
    pub feat_per_view: BTreeMap<ViewId, FeatureIndex>,
}

impl Track {
    pub fn new(desc_type: DescriberType) -> Self {
        Self {
            desc_type,
            feat_per_view: BTreeMap::new(),
        }
    }

    /// Number of distinct views observing the track.
    pub fn len(&self) -> usize {
        self.feat_per_view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feat_per_view.is_empty()
    }

    pub fn feature_in_view(&self, view: ViewId) -> Option<FeatureIndex> {
        self.feat_per_view.get(&view).copied()
    }

    pub fn is_visible_in(&self, view: ViewId) -> bool {
        self.feat_per_view.contains_key(&view)
    }
}

/// All tracks of a scene, keyed by track id.
pub type TracksMap = BTreeMap<TrackId, Track>;

/// Ascending track ids visible in one view.
pub type TrackIdSet = Vec<TrackId>;

/// Per-view inverted index of a [`TracksMap`]; see `query::compute_tracks_per_view`.
pub type TracksPerView = BTreeMap<ViewId, TrackIdSet>;

/// Describer type and feature index of one observation.
pub type FeatureId = (DescriberType, FeatureIndex);
