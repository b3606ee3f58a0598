/// Data layer: core types, loading, filtering and derived views.
///
/// Architecture:
/// ```text
///   restaurant_sample.csv
///        │
///        ▼
///   ┌────────────┐
///   │   loader    │  parse CSV → Table, cached per (path, mtime)
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │   filter    │  keep rows of the selected cities
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │   views     │  city ratings, price/rating, cuisines, preview
///   └────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
