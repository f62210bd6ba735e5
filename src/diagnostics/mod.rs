//! Reports describing a track pipeline run, serialisable for the demo tooling.

pub mod report;
pub mod timing;

pub use report::TrackBuildReport;
pub use timing::{StageTiming, TimingBreakdown};
