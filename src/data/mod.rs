/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (derived fields computed once)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, filter-option index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply race / age-group selection → visible indices
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
