// =============================================================================
// Derived market analytics
// =============================================================================
//
// Pure functions from typed records to the snapshot's derived sections.
// Everything stays in `Decimal`; rounding happens only at presentation.
// Divisions guard the zero-divisor cases the market can legally produce
// (empty ask side, no sell trades) by reporting `None` instead of failing.
// =============================================================================

use rust_decimal::Decimal;

use crate::binance::models::{BookTicker, OrderBook, RecentTrade};
use crate::snapshot::model::{DepthAnalysis, Spread, TradeAnalysis};

/// Levels per side carried into the artifact for inspection.
const TOP_LEVELS: usize = 5;

/// Sum both sides of the book and compute the bid/ask depth ratio.
pub fn analyze_depth(book: &OrderBook) -> DepthAnalysis {
    let total_bid_depth: Decimal = book.bids.iter().map(|l| l.qty).sum();
    let total_ask_depth: Decimal = book.asks.iter().map(|l| l.qty).sum();

    let bid_ask_ratio = if total_ask_depth.is_zero() {
        None
    } else {
        Some(total_bid_depth / total_ask_depth)
    };

    DepthAnalysis {
        total_bid_depth,
        total_ask_depth,
        bid_ask_ratio,
        top_bids: book.bids.iter().take(TOP_LEVELS).cloned().collect(),
        top_asks: book.asks.iter().take(TOP_LEVELS).cloned().collect(),
    }
}

/// Partition the trade window into taker-initiated buys and sells.
///
/// A trade counts as a buy when the buyer was NOT the maker: the buy side
/// crossed the spread, i.e. taker-initiated buying pressure.
pub fn analyze_trades(trades: &[RecentTrade]) -> TradeAnalysis {
    let buy_trades = trades.iter().filter(|t| !t.is_buyer_maker).count() as u64;
    let sell_trades = trades.len() as u64 - buy_trades;

    let buy_sell_ratio = if sell_trades == 0 {
        None
    } else {
        Some(Decimal::from(buy_trades) / Decimal::from(sell_trades))
    };

    let avg_trade_size = if trades.is_empty() {
        Decimal::ZERO
    } else {
        trades.iter().map(|t| t.qty).sum::<Decimal>() / Decimal::from(trades.len() as u64)
    };

    TradeAnalysis {
        total_trades: trades.len() as u64,
        buy_trades,
        sell_trades,
        buy_sell_ratio,
        avg_trade_size,
    }
}

/// Best ask minus best bid, plus the percentage relative to the bid.
pub fn compute_spread(book_ticker: &BookTicker) -> Spread {
    let absolute = book_ticker.ask_price - book_ticker.bid_price;

    let percent = if book_ticker.bid_price.is_zero() {
        None
    } else {
        Some(absolute / book_ticker.bid_price * Decimal::ONE_HUNDRED)
    };

    Spread { absolute, percent }
}
