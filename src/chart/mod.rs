/// Chart-data layer: turn the filtered dataset into the flat collections the
/// three dashboard charts consume.
///
/// ```text
///   Dataset + visible indices
///        │
///        ├──▶ trend        binned two-series line data (score vs. outcome)
///        ├──▶ scatter      per-record points (age vs. score)
///        │
///   static reference
///        └──▶ error_rates  per-race false positive / negative bars
/// ```
///
/// Each function returns a fresh collection; nothing here mutates the
/// dataset, and re-running with the same inputs yields identical output.
pub mod error_rates;
pub mod scatter;
pub mod trend;
