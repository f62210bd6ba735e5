use crate::tracks::FilterOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct TracksDemoConfig {
    /// Pairwise matches JSON, see `io::load_pairwise_matches`.
    pub input: PathBuf,
    #[serde(default)]
    pub filter: FilterOptions,
    pub output: TracksOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct TracksOutputConfig {
    /// Run report with the track length histogram.
    pub summary_json: PathBuf,
    #[serde(default)]
    pub tracks_json: Option<PathBuf>,
    #[serde(default)]
    pub tracks_text: Option<PathBuf>,
}

pub fn parse_config(data: &str) -> Result<TracksDemoConfig, String> {
    serde_json::from_str(data).map_err(|e| format!("Failed to parse config: {e}"))
}

pub fn load_config(path: &Path) -> Result<TracksDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
