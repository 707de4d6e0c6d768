/// Data layer: review records, loading, snapshots and entity filters.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<ReviewRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Snapshot  │  one Series per airline, one point per year (per Metric)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  EntityFilter → which series a render includes
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
