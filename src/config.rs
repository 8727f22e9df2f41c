// =============================================================================
// Snapshot configuration with serde defaults
// =============================================================================
//
// All knobs the pipeline needs in one place: base URL, request timeout,
// output directory, and the per-endpoint fetch limits. Every field carries
// `#[serde(default)]` so an older config file keeps loading after new fields
// are added. The file is optional; a missing or unreadable file falls back
// to defaults with a warning at the call site.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_depth_limit() -> u32 {
    20
}

fn default_trade_limit() -> u32 {
    100
}

fn default_klines_1h_limit() -> u32 {
    24 // last 24 hours
}

fn default_klines_4h_limit() -> u32 {
    42 // last 7 days
}

fn default_klines_1d_limit() -> u32 {
    30 // last 30 days
}

// =============================================================================
// SnapshotConfig
// =============================================================================

/// Runtime configuration for one snapshot invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Exchange REST base URL (public endpoints, no authentication).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory where snapshot JSON artifacts are written.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Order-book depth to request (must be one of the exchange's accepted
    /// values; validated by the client before the call is issued).
    #[serde(default = "default_depth_limit")]
    pub depth_limit: u32,

    /// Recent-trade window size (remote cap: 1000).
    #[serde(default = "default_trade_limit")]
    pub trade_limit: u32,

    /// Klines fetched per timeframe.
    #[serde(default = "default_klines_1h_limit")]
    pub klines_1h_limit: u32,

    #[serde(default = "default_klines_4h_limit")]
    pub klines_4h_limit: u32,

    #[serde(default = "default_klines_1d_limit")]
    pub klines_1d_limit: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            snapshot_dir: default_snapshot_dir(),
            depth_limit: default_depth_limit(),
            trade_limit: default_trade_limit(),
            klines_1h_limit: default_klines_1h_limit(),
            klines_4h_limit: default_klines_4h_limit(),
            klines_1d_limit: default_klines_1d_limit(),
        }
    }
}

impl SnapshotConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            base_url = %config.base_url,
            snapshot_dir = %config.snapshot_dir.display(),
            "config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides on top of whatever was loaded.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MARKET_SNAPSHOT_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
                info!(base_url = %self.base_url, "base URL overridden from environment");
            }
        }
        if let Ok(dir) = std::env::var("MARKET_SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.snapshot_dir = PathBuf::from(dir.trim());
            }
        }
    }
}
