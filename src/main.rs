use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use riskboard::chart::error_rates::ErrorRateEntry;
use riskboard::chart::scatter::ScatterPoint;
use riskboard::chart::trend::TrendPoint;
use riskboard::data::filter::AgeGroupFilter;
use riskboard::data::loader::load_file;
use riskboard::state::DashboardState;

/// Load a risk-assessment dataset, apply a filter selection, and print the
/// three chart collections as JSON for a rendering layer to consume.
#[derive(Parser)]
#[command(name = "riskboard", version, about)]
struct Args {
    /// Dataset file (.csv, .json or .parquet)
    path: PathBuf,

    /// Restrict to these races (repeatable); default is every observed race
    #[arg(long = "race", value_name = "RACE")]
    races: Vec<String>,

    /// Restrict to one age group, e.g. "Less than 25"
    #[arg(long, value_name = "GROUP")]
    age_group: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Everything the rendering layer needs, as one flat JSON document.
#[derive(Serialize)]
struct ChartData {
    trend: Vec<TrendPoint>,
    error_rates: Vec<ErrorRateEntry>,
    scatter: Vec<ScatterPoint>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = load_file(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    log::info!(
        "Loaded {} records ({} races, {} age groups)",
        dataset.len(),
        dataset.race_options.len(),
        dataset.age_group_options.len()
    );

    let mut state = DashboardState::default();
    state.set_dataset(dataset);

    if !args.races.is_empty() {
        if let Some(ds) = &state.dataset {
            for race in &args.races {
                if !ds.race_options.contains(race) {
                    log::warn!("--race '{race}' does not occur in the dataset");
                }
            }
        }
        state.selection.races = args.races.iter().cloned().collect();
    }
    if let Some(group) = args.age_group {
        state.selection.age_group = AgeGroupFilter::Group(group);
    }
    state.refilter();
    log::info!(
        "{} of {} records visible after filtering",
        state.visible_indices.len(),
        state.dataset.as_ref().map_or(0, |ds| ds.len())
    );

    let charts = ChartData {
        trend: state.trend_series(),
        error_rates: state.error_rate_rows(),
        scatter: state.scatter_points(),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&charts)
    } else {
        serde_json::to_string(&charts)
    }
    .context("serializing chart data")?;
    println!("{json}");

    Ok(())
}
