// =============================================================================
// MarketSnapshot - the immutable unit of output
// =============================================================================
//
// Created once per invocation, never mutated after assembly, and either
// printed or written to a JSON file. Field names here define the artifact
// format; ratios that can be undefined (empty ask side, zero sell trades)
// are `Option` and serialise as `null`.
// =============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::binance::models::{BookLevel, BookTicker, Kline};

/// Pass-through price/volume summary built from the price tick, the rolling
/// average price, and the 24h statistics. Nothing here is recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub price: Decimal,
    pub avg_price_5m: Decimal,
    pub price_change_24h: Decimal,
    pub price_change_percent_24h: Decimal,
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub volume_24h: Decimal,
    pub quote_volume_24h: Decimal,
    pub trade_count_24h: u64,
}

/// Best ask minus best bid, from the book ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub absolute: Decimal,
    /// spread / best bid * 100; `None` when the best bid is zero.
    pub percent: Option<Decimal>,
}

/// Totals and ratio derived from the order-book levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthAnalysis {
    pub total_bid_depth: Decimal,
    pub total_ask_depth: Decimal,
    /// `None` when the ask side is empty; a valid, if unusual, market state.
    pub bid_ask_ratio: Option<Decimal>,
    pub top_bids: Vec<BookLevel>,
    pub top_asks: Vec<BookLevel>,
}

/// Buy/sell split of the recent-trade window, classified by the maker flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub total_trades: u64,
    pub buy_trades: u64,
    pub sell_trades: u64,
    /// `None` when there were no sell trades in the window.
    pub buy_sell_ratio: Option<Decimal>,
    pub avg_trade_size: Decimal,
}

/// Trailing candle windows attached verbatim per timeframe, for downstream
/// trend inspection. No derived statistics beyond what was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineWindows {
    #[serde(rename = "1h")]
    pub h1: Vec<Kline>,
    #[serde(rename = "4h")]
    pub h4: Vec<Kline>,
    #[serde(rename = "1d")]
    pub d1: Vec<Kline>,
}

/// One complete market snapshot for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Capture time (local clock at assembly, not any server-provided time).
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub summary: Summary,
    pub book_ticker: BookTicker,
    pub spread: Spread,
    pub depth_analysis: DepthAnalysis,
    pub trade_analysis: TradeAnalysis,
    pub klines: KlineWindows,
}
