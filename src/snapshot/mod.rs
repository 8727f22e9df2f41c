pub mod aggregator;
pub mod analysis;
pub mod model;

// Re-export the top-level entry points (e.g. `use crate::snapshot::create_snapshot`).
pub use aggregator::create_snapshot;
pub use model::MarketSnapshot;
