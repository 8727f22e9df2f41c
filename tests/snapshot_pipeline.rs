// =============================================================================
// End-to-end pipeline test on fixture payloads
// =============================================================================
//
// Drives the full pipeline below the HTTP layer: exchange-shaped JSON
// fixtures are parsed through the typed records, assembled into a snapshot,
// rendered, persisted, and loaded back.
// =============================================================================

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use market_snapshot::binance::models::{
    AvgPrice, BookTicker, Kline, OrderBook, PriceTick, RecentTrade, Ticker24h,
};
use market_snapshot::persist::SnapshotStore;
use market_snapshot::report;
use market_snapshot::snapshot::aggregator::{assemble, SnapshotInputs};
use market_snapshot::types::Symbol;

/// Build the full input set from exchange-shaped JSON, the way the client
/// would produce it from live responses.
fn fixture_inputs() -> SnapshotInputs {
    let price: PriceTick =
        serde_json::from_value(json!({"symbol": "ETHUSDT", "price": "3890.45"})).unwrap();

    let stats: Ticker24h = serde_json::from_value(json!({
        "symbol": "ETHUSDT",
        "priceChange": "90.45",
        "priceChangePercent": "2.380",
        "weightedAvgPrice": "3850.00",
        "prevClosePrice": "3800.00",
        "lastPrice": "3890.45",
        "bidPrice": "3890.00",
        "askPrice": "3890.01",
        "openPrice": "3800.00",
        "highPrice": "3920.00",
        "lowPrice": "3790.00",
        "volume": "125000.50",
        "quoteVolume": "486400000.00",
        "openTime": 1699999999000i64,
        "closeTime": 1700099999000i64,
        "count": 1250000
    }))
    .unwrap();

    // 20 levels per side, constant quantity, so the totals are exact:
    // bids 20 * 6.275 = 125.5, asks 20 * 5.91 = 118.2.
    let bids: Vec<serde_json::Value> = (0..20)
        .map(|i| json!([format!("{}.00", 3890 - i), "6.275"]))
        .collect();
    let asks: Vec<serde_json::Value> = (0..20)
        .map(|i| json!([format!("{}.01", 3890 + i), "5.91"]))
        .collect();
    let book: OrderBook = serde_json::from_value(json!({
        "lastUpdateId": 987654321,
        "bids": bids,
        "asks": asks
    }))
    .unwrap();

    // 100 trades: the first 52 taker-buys, the rest taker-sells.
    let trades: Vec<RecentTrade> = (0..100)
        .map(|i| {
            serde_json::from_value(json!({
                "id": 5000000 + i,
                "price": "3890.00",
                "qty": "0.5",
                "quoteQty": "1945.00",
                "time": 1700000000000i64 + i,
                "isBuyerMaker": i >= 52
            }))
            .unwrap()
        })
        .collect();

    let avg_price: AvgPrice =
        serde_json::from_value(json!({"mins": 5, "price": "3889.10"})).unwrap();

    let book_ticker: BookTicker = serde_json::from_value(json!({
        "symbol": "ETHUSDT",
        "bidPrice": "3890.00",
        "bidQty": "10.5",
        "askPrice": "3890.01",
        "askQty": "8.2"
    }))
    .unwrap();

    SnapshotInputs {
        price,
        stats,
        book,
        trades,
        avg_price,
        book_ticker,
        klines_1h: kline_rows(24, 3_600_000),
        klines_4h: kline_rows(42, 4 * 3_600_000),
        klines_1d: kline_rows(30, 24 * 3_600_000),
    }
}

fn kline_rows(count: i64, step_ms: i64) -> Vec<Kline> {
    (0..count)
        .map(|i| {
            let row = json!([
                1700000000000i64 + i * step_ms,
                "3850.00",
                "3900.00",
                "3800.00",
                "3890.00",
                "1000.00",
                1700000000000i64 + (i + 1) * step_ms - 1,
                "3870000.00",
                5000,
                "600.00",
                "2322000.00",
                "0"
            ]);
            Kline::from_row(&row).unwrap()
        })
        .collect()
}

#[test]
fn snapshot_carries_exact_derived_figures() {
    let symbol = Symbol::parse("ethusdt").unwrap();
    let snap = assemble(&symbol, fixture_inputs());

    assert_eq!(snap.symbol, "ETHUSDT");
    assert_eq!(snap.summary.price, dec!(3890.45));
    assert_eq!(snap.summary.avg_price_5m, dec!(3889.10));
    assert_eq!(snap.summary.trade_count_24h, 1_250_000);

    assert_eq!(snap.depth_analysis.total_bid_depth, dec!(125.500));
    assert_eq!(snap.depth_analysis.total_ask_depth, dec!(118.20));
    let ratio = snap.depth_analysis.bid_ask_ratio.unwrap();
    assert_eq!(ratio.round_dp(2), dec!(1.06));
    assert_eq!(snap.depth_analysis.top_bids.len(), 5);
    assert_eq!(snap.depth_analysis.top_asks.len(), 5);

    assert_eq!(snap.trade_analysis.total_trades, 100);
    assert_eq!(snap.trade_analysis.buy_trades, 52);
    assert_eq!(snap.trade_analysis.sell_trades, 48);
    assert_eq!(snap.trade_analysis.avg_trade_size, dec!(0.5));

    assert_eq!(snap.spread.absolute, dec!(0.01));
    assert!(snap.spread.percent.is_some());
}

#[test]
fn reported_change_is_consistent_with_open_and_last() {
    let snap = assemble(&Symbol::parse("ETHUSDT").unwrap(), fixture_inputs());

    // (last - open) / open * 100 should agree with the exchange-reported
    // percentage to within its published precision.
    let derived = (dec!(3890.45) - dec!(3800.00)) / dec!(3800.00) * Decimal::ONE_HUNDRED;
    let reported = snap.summary.price_change_percent_24h;
    assert!((derived - reported).abs() < dec!(0.01));
}

#[test]
fn kline_windows_keep_only_the_trailing_rows() {
    let snap = assemble(&Symbol::parse("ETHUSDT").unwrap(), fixture_inputs());

    assert_eq!(snap.klines.h1.len(), 6);
    assert_eq!(snap.klines.h4.len(), 6);
    assert_eq!(snap.klines.d1.len(), 7);

    // The kept rows must be the most recent ones of the fetched series.
    let last_1h = snap.klines.h1.last().unwrap();
    assert_eq!(last_1h.open_time, 1700000000000i64 + 23 * 3_600_000);
}

#[test]
fn snapshot_survives_persistence_round_trip() {
    let mut snap = assemble(&Symbol::parse("ETHUSDT").unwrap(), fixture_inputs());
    // Pin the capture time so the filename is deterministic for this test.
    snap.timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

    let dir = std::env::temp_dir().join(format!("snapshot-pipeline-{}", std::process::id()));
    let store = SnapshotStore::new(&dir);

    let path = store.save(&snap).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "ethusdt_20240115_103000.json"
    );

    let loaded = store.load(&path).unwrap();
    assert_eq!(loaded, snap);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rendered_report_matches_the_assembled_snapshot() {
    let snap = assemble(&Symbol::parse("ETHUSDT").unwrap(), fixture_inputs());
    let rendered = report::render_snapshot(&snap);

    assert!(rendered.contains("Symbol: ETHUSDT"));
    assert!(rendered.contains("Price: $3890.45"));
    assert!(rendered.contains("Buy Trades: 52"));
    assert!(rendered.contains("Sell Trades: 48"));
    assert!(rendered.contains("Bid/Ask Ratio: 1.06"));
}
