use feature_tracks::config::tracks::{self, TracksDemoConfig};
use feature_tracks::diagnostics::TrackBuildReport;
use feature_tracks::io::{load_pairwise_matches, write_json_file, write_tracks_text_file};
use feature_tracks::query::{compute_tracks_per_view, image_ids_in_tracks_per_view};
use feature_tracks::{TracksBuilder, ViewId};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = tracks::load_config(Path::new(&config_path))?;

    let matches = load_pairwise_matches(&config.input)?;
    let build = TracksBuilder::new(config.filter)
        .run(&matches)
        .map_err(|e| format!("Track export failed: {e}"))?;

    let per_view = compute_tracks_per_view(&build.tracks);
    let summary = TracksDemoSummary {
        input: config.input.display().to_string(),
        view_count: image_ids_in_tracks_per_view(&per_view).len(),
        tracks_per_view: per_view.iter().map(|(&v, ids)| (v, ids.len())).collect(),
        report: build.report,
    };

    print_text_summary(&config, &summary);
    write_json_file(&config.output.summary_json, &summary)?;
    if let Some(path) = &config.output.tracks_json {
        write_json_file(path, &build.tracks)?;
    }
    if let Some(path) = &config.output.tracks_text {
        write_tracks_text_file(path, &build.tracks)?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TracksDemoSummary {
    input: String,
    view_count: usize,
    tracks_per_view: Vec<(ViewId, usize)>,
    report: TrackBuildReport,
}

fn print_text_summary(config: &TracksDemoConfig, summary: &TracksDemoSummary) {
    let report = &summary.report;
    println!("Track summary");
    println!("  matches: {}", report.match_count);
    println!("  observations: {}", report.node_count);
    println!("  components: {}", report.component_count);
    println!(
        "  discarded: {} forks, {} short (min length {})",
        report.discarded_forks, report.discarded_short, config.filter.min_track_length
    );
    println!("  tracks: {} over {} views", report.track_count, summary.view_count);
    for (len, count) in &report.length_histogram {
        println!("    length {len}: {count}");
    }
    for stage in &report.timing.stages {
        println!("  {}: {:.3} ms", stage.label, stage.elapsed_ms);
    }
    println!("Summary written to {}", config.output.summary_json.display());
}

fn usage() -> String {
    "Usage: tracks_demo <config.json>".to_string()
}
