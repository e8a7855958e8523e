use clap::ValueEnum;
use pulse_core::PulseResult;
use pulse_ingest::Dataset;
use pulse_reporting::export::{view_csv, view_json};
use pulse_reporting::render::render_view;
use pulse_reporting::{DashboardEngine, DashboardQuery, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub view: View,
    pub leaderboard_limit: Option<usize>,
}

/// Recompute the dashboard for `query` and render the requested view.
pub fn render(dataset: &Dataset, query: &DashboardQuery, options: &OutputOptions) -> PulseResult<String> {
    let engine = DashboardEngine::new(dataset);
    let dashboard = engine.build(query);
    let records = match options.view {
        View::Records => engine.record_metrics(query),
        _ => Vec::new(),
    };

    match options.format {
        OutputFormat::Text => Ok(render_view(&dashboard, options.view, &records, options.leaderboard_limit)),
        OutputFormat::Json => view_json(&dashboard, options.view, &records, options.leaderboard_limit),
        OutputFormat::Csv => view_csv(&dashboard, options.view, &records, options.leaderboard_limit),
    }
}
