// =============================================================================
// Binance REST API Client - public market-data endpoints
// =============================================================================
//
// All endpoints consumed here are public and require no authentication.
// One pooled `reqwest::Client` is shared across calls; the per-request
// timeout comes from configuration. Limit and interval arguments are
// validated locally before any network I/O. Errors are never retried;
// the caller decides whether to abort or proceed.
//
// API documentation: https://binance-docs.github.io/apidocs/spot/en/
// =============================================================================

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::binance::models::{
    AvgPrice, BookTicker, Kline, OrderBook, PriceTick, RecentTrade, Ticker24h,
};
use crate::config::SnapshotConfig;
use crate::error::{SnapshotError, SnapshotResult};
use crate::types::{KlineInterval, Symbol};

/// Depth values the /depth endpoint accepts for `limit`.
pub const DEPTH_LIMITS: [u32; 8] = [5, 10, 20, 50, 100, 500, 1000, 5000];

/// Remote cap on the `limit` parameter of /trades and /klines.
pub const MAX_ROWS: u32 = 1000;

/// Maximum response-body excerpt carried into an error message.
const ERROR_BODY_EXCERPT: usize = 256;

/// Client for the Binance public REST API.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new client with the base URL and timeout from `config`.
    pub fn new(config: &SnapshotConfig) -> SnapshotResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SnapshotError::Transport(format!("failed to build http client: {e}")))?;

        debug!(base_url = %config.base_url, "BinanceClient initialised");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    /// Issue a GET and deserialise the JSON body into `T`.
    ///
    /// A non-2xx status becomes a `Response` error carrying the status code
    /// and a body excerpt; connectivity failures and timeouts become
    /// `Transport` errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> SnapshotResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "issuing GET");

        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_EXCERPT).collect();
            return Err(SnapshotError::Response(format!(
                "GET {path} returned {status}: {excerpt}"
            )));
        }

        let body = resp.text().await?;
        let parsed = serde_json::from_str(&body)
            .map_err(|e| SnapshotError::Response(format!("GET {path}: {e}")))?;
        Ok(parsed)
    }

    // -------------------------------------------------------------------------
    // Market data endpoints
    // -------------------------------------------------------------------------

    /// GET /api/v3/ping - connectivity test.
    pub async fn ping(&self) -> bool {
        self.get_json::<serde_json::Value>("/api/v3/ping", &[])
            .await
            .is_ok()
    }

    /// GET /api/v3/ticker/price - current price.
    pub async fn get_price(&self, symbol: &Symbol) -> SnapshotResult<PriceTick> {
        self.get_json("/api/v3/ticker/price", &[("symbol", symbol.to_string())])
            .await
    }

    /// GET /api/v3/ticker/24hr - 24-hour rolling statistics.
    pub async fn get_daily_stats(&self, symbol: &Symbol) -> SnapshotResult<Ticker24h> {
        self.get_json("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }

    /// GET /api/v3/depth - order-book depth.
    ///
    /// `limit` must be one of [`DEPTH_LIMITS`]; any other value fails with
    /// `InvalidArgument` before a request is issued.
    pub async fn get_order_book(&self, symbol: &Symbol, limit: u32) -> SnapshotResult<OrderBook> {
        validate_depth_limit(limit)?;
        self.get_json(
            "/api/v3/depth",
            &[
                ("symbol", symbol.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// GET /api/v3/trades - recent trades. `limit` is capped at the remote
    /// maximum rather than rejected.
    pub async fn get_recent_trades(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> SnapshotResult<Vec<RecentTrade>> {
        let limit = limit.min(MAX_ROWS);
        let trades: Vec<RecentTrade> = self
            .get_json(
                "/api/v3/trades",
                &[
                    ("symbol", symbol.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        debug!(symbol = %symbol, count = trades.len(), "recent trades fetched");
        Ok(trades)
    }

    /// GET /api/v3/klines - candlestick data, parsed from the array-of-arrays
    /// response format. `limit` is capped at the remote maximum.
    pub async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: KlineInterval,
        limit: u32,
    ) -> SnapshotResult<Vec<Kline>> {
        let limit = limit.min(MAX_ROWS);
        let body: serde_json::Value = self
            .get_json(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let rows = body
            .as_array()
            .ok_or_else(|| SnapshotError::Response("klines response is not an array".into()))?;

        let mut klines = Vec::with_capacity(rows.len());
        for row in rows {
            klines.push(Kline::from_row(row)?);
        }

        debug!(symbol = %symbol, interval = %interval, count = klines.len(), "klines fetched");
        Ok(klines)
    }

    /// GET /api/v3/avgPrice - current average price over a rolling window.
    pub async fn get_avg_price(&self, symbol: &Symbol) -> SnapshotResult<AvgPrice> {
        self.get_json("/api/v3/avgPrice", &[("symbol", symbol.to_string())])
            .await
    }

    /// GET /api/v3/ticker/bookTicker - best bid/ask with quantities.
    pub async fn get_book_ticker(&self, symbol: &Symbol) -> SnapshotResult<BookTicker> {
        self.get_json(
            "/api/v3/ticker/bookTicker",
            &[("symbol", symbol.to_string())],
        )
        .await
    }
}

/// Check that `limit` is one of the depth values the remote API accepts.
pub fn validate_depth_limit(limit: u32) -> SnapshotResult<()> {
    if DEPTH_LIMITS.contains(&limit) {
        Ok(())
    } else {
        Err(SnapshotError::InvalidArgument(format!(
            "depth limit {limit} not accepted by the exchange; allowed values: {DEPTH_LIMITS:?}"
        )))
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> BinanceClient {
        // Unroutable base URL: any test that actually issued a request
        // would fail with a transport error, not the assertion below.
        let config = SnapshotConfig {
            base_url: "http://192.0.2.1:1".into(),
            request_timeout_secs: 1,
            ..SnapshotConfig::default()
        };
        BinanceClient::new(&config).unwrap()
    }

    #[test]
    fn depth_limit_validation_accepts_documented_values() {
        for limit in DEPTH_LIMITS {
            assert!(validate_depth_limit(limit).is_ok());
        }
    }

    #[test]
    fn depth_limit_validation_rejects_others() {
        for limit in [0, 7, 21, 999, 5001] {
            assert!(matches!(
                validate_depth_limit(limit),
                Err(SnapshotError::InvalidArgument(_))
            ));
        }
    }

    #[tokio::test]
    async fn bad_depth_limit_fails_before_any_network_call() {
        let client = test_client();
        let symbol = Symbol::parse("ETHUSDT").unwrap();
        let err = client.get_order_book(&symbol, 7).await.unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidArgument(_)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let config = SnapshotConfig {
            base_url: "https://api.binance.com/".into(),
            ..SnapshotConfig::default()
        };
        let client = BinanceClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://api.binance.com");
    }
}
