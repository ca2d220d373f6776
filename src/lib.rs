//! Data pipeline for an interactive COMPAS risk-assessment dashboard.
//!
//! The crate loads the two-year recidivism dataset into typed records,
//! applies the user's race / age-group selection, and produces the flat
//! collections three linked charts consume:
//!
//! * [`chart::trend`] – mean COMPAS score and mean recidivism rate per
//!   prior-conviction bin, in long format for a multi-series line renderer
//! * [`chart::error_rates`] – published per-race false positive / negative
//!   rates, melted to long format for a grouped bar renderer
//! * [`chart::scatter`] – per-record points for a faceted age-vs-score
//!   scatter
//!
//! Rendering is left to the consumer; the `riskboard` binary stands in for
//! it by printing the three collections as JSON.

pub mod chart;
pub mod data;
pub mod state;
