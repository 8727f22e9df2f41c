// =============================================================================
// Market Snapshot - Binance public market data analytics
// =============================================================================
//
// Library surface for the market-snapshot CLI. The pipeline is intentionally
// simple: issue a handful of independent GET calls against the public REST
// API, parse each response into a typed record, derive a small set of ratios,
// and assemble everything into one immutable snapshot that is printed and
// optionally written to disk.
// =============================================================================

pub mod binance;
pub mod config;
pub mod error;
pub mod persist;
pub mod report;
pub mod snapshot;
pub mod types;
