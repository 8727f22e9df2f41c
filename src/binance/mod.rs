pub mod client;
pub mod models;

// Re-export the client for convenient access (e.g. `use crate::binance::BinanceClient`).
pub use client::BinanceClient;
