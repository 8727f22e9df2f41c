// =============================================================================
// Snapshot aggregator - concurrent fetch, pure assembly
// =============================================================================
//
// The fetches have no data dependency on each other, so they run
// concurrently on the shared pooled connection and are joined before
// aggregation continues. If any single call fails the whole snapshot is
// aborted: composite market analytics built from partial data are
// misleading, so there is deliberately no partial-result mode.
// =============================================================================

use chrono::Utc;
use tracing::info;

use crate::binance::client::BinanceClient;
use crate::binance::models::{
    AvgPrice, BookTicker, Kline, OrderBook, PriceTick, RecentTrade, Ticker24h,
};
use crate::config::SnapshotConfig;
use crate::error::SnapshotResult;
use crate::snapshot::analysis;
use crate::snapshot::model::{KlineWindows, MarketSnapshot, Summary};
use crate::types::{KlineInterval, Symbol};

/// Trailing window sizes persisted per timeframe: last 6 hours, last 24
/// hours, last 7 days.
const WINDOW_1H: usize = 6;
const WINDOW_4H: usize = 6;
const WINDOW_1D: usize = 7;

/// Everything the assembly step needs, fetched up front.
///
/// Splitting fetch from assembly keeps the derivation a pure function of
/// typed records, which is also how the test fixtures drive it.
#[derive(Debug, Clone)]
pub struct SnapshotInputs {
    pub price: PriceTick,
    pub stats: Ticker24h,
    pub book: OrderBook,
    pub trades: Vec<RecentTrade>,
    pub avg_price: AvgPrice,
    pub book_ticker: BookTicker,
    pub klines_1h: Vec<Kline>,
    pub klines_4h: Vec<Kline>,
    pub klines_1d: Vec<Kline>,
}

/// Fetch all inputs for `symbol` concurrently and assemble one snapshot.
pub async fn create_snapshot(
    client: &BinanceClient,
    symbol: &Symbol,
    config: &SnapshotConfig,
) -> SnapshotResult<MarketSnapshot> {
    info!(symbol = %symbol, "collecting market snapshot data");

    let (price, stats, book, trades, avg_price, book_ticker, klines_1h, klines_4h, klines_1d) =
        tokio::try_join!(
            client.get_price(symbol),
            client.get_daily_stats(symbol),
            client.get_order_book(symbol, config.depth_limit),
            client.get_recent_trades(symbol, config.trade_limit),
            client.get_avg_price(symbol),
            client.get_book_ticker(symbol),
            client.get_klines(symbol, KlineInterval::OneHour, config.klines_1h_limit),
            client.get_klines(symbol, KlineInterval::FourHours, config.klines_4h_limit),
            client.get_klines(symbol, KlineInterval::OneDay, config.klines_1d_limit),
        )?;

    let snapshot = assemble(
        symbol,
        SnapshotInputs {
            price,
            stats,
            book,
            trades,
            avg_price,
            book_ticker,
            klines_1h,
            klines_4h,
            klines_1d,
        },
    );

    info!(
        symbol = %symbol,
        price = %snapshot.summary.price,
        buy_trades = snapshot.trade_analysis.buy_trades,
        sell_trades = snapshot.trade_analysis.sell_trades,
        "snapshot assembled"
    );

    Ok(snapshot)
}

/// Assemble the immutable snapshot from fetched records.
///
/// Pure except for the capture timestamp, which is stamped here (local
/// clock, not any server-provided time).
pub fn assemble(symbol: &Symbol, inputs: SnapshotInputs) -> MarketSnapshot {
    let summary = Summary {
        price: inputs.price.price,
        avg_price_5m: inputs.avg_price.price,
        price_change_24h: inputs.stats.price_change,
        price_change_percent_24h: inputs.stats.price_change_percent,
        high_24h: inputs.stats.high_price,
        low_24h: inputs.stats.low_price,
        volume_24h: inputs.stats.volume,
        quote_volume_24h: inputs.stats.quote_volume,
        trade_count_24h: inputs.stats.trade_count,
    };

    let depth_analysis = analysis::analyze_depth(&inputs.book);
    let trade_analysis = analysis::analyze_trades(&inputs.trades);
    let spread = analysis::compute_spread(&inputs.book_ticker);

    let klines = KlineWindows {
        h1: trailing(inputs.klines_1h, WINDOW_1H),
        h4: trailing(inputs.klines_4h, WINDOW_4H),
        d1: trailing(inputs.klines_1d, WINDOW_1D),
    };

    MarketSnapshot {
        timestamp: Utc::now(),
        symbol: symbol.to_string(),
        summary,
        book_ticker: inputs.book_ticker,
        spread,
        depth_analysis,
        trade_analysis,
        klines,
    }
}

/// Keep only the last `keep` rows of a candle series.
fn trailing(mut rows: Vec<Kline>, keep: usize) -> Vec<Kline> {
    if rows.len() > keep {
        rows.split_off(rows.len() - keep)
    } else {
        rows
    }
}
