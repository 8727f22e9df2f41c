// =============================================================================
// Console report rendering
// =============================================================================
//
// Fixed-width textual report. Rendering is a pure function of the snapshot
// (or of the info-mode records); the only I/O is the caller printing the
// returned string to stdout. Decimals are rounded here and nowhere earlier.
// =============================================================================

use chrono::Utc;
use rust_decimal::Decimal;

use crate::binance::models::{BookTicker, Ticker24h};
use crate::snapshot::model::MarketSnapshot;

const LINE_WIDTH: usize = 80;

/// Header printed before any data is fetched.
pub fn render_header(symbol: &str, mode: &str) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"=".repeat(LINE_WIDTH));
    out.push('\n');
    out.push_str(&format!("  MARKET SNAPSHOT - {symbol}\n"));
    out.push_str(&"=".repeat(LINE_WIDTH));
    out.push_str("\n\n");
    out.push_str(&format!(
        "  Started: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!("  Mode: {mode}\n\n"));
    out.push_str(&"-".repeat(LINE_WIDTH));
    out.push('\n');
    out
}

/// Footer printed after the command completes.
pub fn render_footer() -> String {
    let mut out = String::new();
    out.push_str(&"-".repeat(LINE_WIDTH));
    out.push('\n');
    out.push_str(&format!(
        "  Completed: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&"=".repeat(LINE_WIDTH));
    out.push_str("\n\n");
    out
}

/// Full-snapshot report body. Deterministic given the snapshot.
pub fn render_snapshot(snapshot: &MarketSnapshot) -> String {
    let s = &snapshot.summary;
    let d = &snapshot.depth_analysis;
    let t = &snapshot.trade_analysis;
    let sp = &snapshot.spread;

    let mut out = String::new();

    out.push_str(&format!("  Symbol: {}\n", snapshot.symbol));
    out.push_str(&format!("  Price: ${:.2}\n", s.price));
    out.push_str(&format!("  5m Avg Price: ${:.2}\n", s.avg_price_5m));
    out.push_str(&format!(
        "  24h Change: {:+.2} ({:+.2}%)\n",
        s.price_change_24h, s.price_change_percent_24h
    ));
    out.push_str(&format!(
        "  24h Range: ${:.2} - ${:.2}\n",
        s.low_24h, s.high_24h
    ));
    out.push_str(&format!("  24h Volume: {:.2}\n", s.volume_24h));
    out.push_str(&format!("  24h Quote Volume: ${:.2}\n", s.quote_volume_24h));
    out.push_str(&format!("  24h Trades: {}\n\n", s.trade_count_24h));

    out.push_str(&format!(
        "  Order Book Depth (top {} levels):\n",
        d.top_bids.len().max(d.top_asks.len())
    ));
    out.push_str(&format!("    Total Bid Depth: {:.4}\n", d.total_bid_depth));
    out.push_str(&format!("    Total Ask Depth: {:.4}\n", d.total_ask_depth));
    out.push_str(&format!(
        "    Bid/Ask Ratio: {}\n\n",
        fmt_ratio(d.bid_ask_ratio)
    ));

    out.push_str(&format!(
        "  Recent Trade Analysis (last {}):\n",
        t.total_trades
    ));
    out.push_str(&format!(
        "    Buy Trades: {} ({})\n",
        t.buy_trades,
        fmt_share(t.buy_trades, t.total_trades)
    ));
    out.push_str(&format!(
        "    Sell Trades: {} ({})\n",
        t.sell_trades,
        fmt_share(t.sell_trades, t.total_trades)
    ));
    out.push_str(&format!(
        "    Buy/Sell Ratio: {}\n",
        fmt_ratio(t.buy_sell_ratio)
    ));
    out.push_str(&format!("    Avg Trade Size: {:.4}\n\n", t.avg_trade_size));

    out.push_str(&format!(
        "  Spread: ${:.4} ({})\n\n",
        sp.absolute,
        match sp.percent {
            Some(pct) => format!("{:.4}%", pct),
            None => "n/a".to_string(),
        }
    ));

    out
}

/// Info-mode body: 24h statistics plus the best bid/ask.
pub fn render_info(stats: &Ticker24h, book: &BookTicker) -> String {
    let mut out = String::new();

    out.push_str(&format!("  Symbol: {}\n\n", stats.symbol));
    out.push_str(&format!("  Price: ${:.2}\n", stats.last_price));
    out.push_str(&format!(
        "  24h Change: {:+.2} ({:+.2}%)\n",
        stats.price_change, stats.price_change_percent
    ));
    out.push_str(&format!("  24h High: ${:.2}\n", stats.high_price));
    out.push_str(&format!("  24h Low: ${:.2}\n", stats.low_price));
    out.push_str(&format!("  24h Volume: {:.2}\n", stats.volume));
    out.push_str(&format!("  24h Trades: {}\n\n", stats.trade_count));

    out.push_str(&format!(
        "  Best Bid: ${:.2} ({:.4})\n",
        book.bid_price, book.bid_qty
    ));
    out.push_str(&format!(
        "  Best Ask: ${:.2} ({:.4})\n",
        book.ask_price, book.ask_qty
    ));

    let spread = book.ask_price - book.bid_price;
    if book.bid_price.is_zero() {
        out.push_str(&format!("  Spread: ${:.4} (n/a)\n", spread));
    } else {
        out.push_str(&format!(
            "  Spread: ${:.4} ({:.4}%)\n",
            spread,
            spread / book.bid_price * Decimal::ONE_HUNDRED
        ));
    }

    out
}

fn fmt_ratio(ratio: Option<Decimal>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => "n/a".to_string(),
    }
}

fn fmt_share(part: u64, total: u64) -> String {
    if total == 0 {
        return "n/a".to_string();
    }
    let pct = Decimal::from(part) / Decimal::from(total) * Decimal::ONE_HUNDRED;
    format!("{:.1}%", pct)
}
