/// Data layer: core types, loading, filtering and the derived views.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PenguinDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PenguinDataset  │  Vec<Penguin>, read-only
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  species selection / island → filtered indices
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌───────────┐  ┌──────────┐  ┌──────────┐
///   │ histogram  │  │ scatter   │  │  table    │
///   └───────────┘  └──────────┘  └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod scatter;
pub mod table;
