use crate::chart::error_rates::{error_rate_rows, ErrorRateEntry};
use crate::chart::scatter::{scatter_points, ScatterPoint};
use crate::chart::trend::{trend_series, TrendPoint};
use crate::data::filter::{filtered_indices, AgeGroupFilter, FilterSelection};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The dashboard's full data state, independent of any rendering layer.
///
/// The dataset is loaded once and never mutated; every selection change
/// recomputes `visible_indices`, and the chart collections are derived fresh
/// on each accessor call. Re-running with the same dataset and selection
/// always yields identical collections.
#[derive(Default)]
pub struct DashboardState {
    /// Loaded dataset (None until the caller loads a file).
    pub dataset: Option<Dataset>,

    /// Current race / age-group selection.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,
}

impl DashboardState {
    /// Ingest a newly loaded dataset and reset the selection to show all.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::select_all(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
        }
    }

    /// Toggle one race in the selection.
    pub fn toggle_race(&mut self, race: &str) {
        if !self.selection.races.remove(race) {
            self.selection.races.insert(race.to_string());
        }
        self.refilter();
    }

    /// Select every observed race.
    pub fn select_all_races(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.races = ds.race_options.iter().cloned().collect();
        }
        self.refilter();
    }

    /// Deselect every race (shows nothing).
    pub fn select_no_races(&mut self) {
        self.selection.races.clear();
        self.refilter();
    }

    /// Set the age-group constraint.
    pub fn set_age_group(&mut self, age_group: AgeGroupFilter) {
        self.selection.age_group = age_group;
        self.refilter();
    }

    /// Long-format data for the score-vs-outcome trend chart.
    pub fn trend_series(&self) -> Vec<TrendPoint> {
        match &self.dataset {
            Some(ds) => trend_series(ds, &self.visible_indices),
            None => Vec::new(),
        }
    }

    /// Long-format rows for the per-race error-rate bars (static reference
    /// data, unaffected by the selection).
    pub fn error_rate_rows(&self) -> Vec<ErrorRateEntry> {
        error_rate_rows()
    }

    /// Points for the demographic scatter.
    pub fn scatter_points(&self) -> Vec<ScatterPoint> {
        match &self.dataset {
            Some(ds) => scatter_points(ds, &self.visible_indices),
            None => Vec::new(),
        }
    }
}
