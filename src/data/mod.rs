/// Data layer: core types, loading, and date filtering.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (types inferred per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Column>, declared column types
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  coerce chosen column → apply date-range predicate
///   └──────────┘
/// ```
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
