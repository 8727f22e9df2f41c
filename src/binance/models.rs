// =============================================================================
// Typed records for the public market-data endpoints
// =============================================================================
//
// Each struct mirrors one endpoint's documented JSON shape. The exchange
// encodes prices and quantities as JSON strings; every such field is a
// `rust_decimal::Decimal` so aggregation downstream never loses cents or
// basis points to binary floating point. A missing or mistyped field fails
// deserialisation, which the client surfaces as a response error.
// =============================================================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SnapshotError, SnapshotResult};

/// Current price for a symbol (GET /api/v3/ticker/price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub symbol: String,
    pub price: Decimal,
}

/// 24-hour rolling statistics (GET /api/v3/ticker/24hr).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub price_change: Decimal,
    pub price_change_percent: Decimal,
    pub weighted_avg_price: Decimal,
    pub prev_close_price: Decimal,
    pub last_price: Decimal,
    pub bid_price: Decimal,
    pub ask_price: Decimal,
    pub open_price: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
    pub quote_volume: Decimal,
    pub open_time: i64,
    pub close_time: i64,
    #[serde(rename = "count")]
    pub trade_count: u64,
}

/// One price level of the order book. The wire shape is a two-element array
/// of strings, `["price", "qty"]`, preserved on re-serialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Decimal, Decimal)", into = "(Decimal, Decimal)")]
pub struct BookLevel {
    pub price: Decimal,
    pub qty: Decimal,
}

impl From<(Decimal, Decimal)> for BookLevel {
    fn from((price, qty): (Decimal, Decimal)) -> Self {
        Self { price, qty }
    }
}

impl From<BookLevel> for (Decimal, Decimal) {
    fn from(level: BookLevel) -> Self {
        (level.price, level.qty)
    }
}

/// Order-book depth snapshot (GET /api/v3/depth). Bids are ordered by
/// descending price, asks by ascending price, as returned by the exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    pub last_update_id: u64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

/// A single recent trade (GET /api/v3/trades).
///
/// `is_buyer_maker == false` means the buy side was taker-initiated; the
/// trade-analysis step classifies it as buying pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTrade {
    pub id: u64,
    pub price: Decimal,
    pub qty: Decimal,
    pub quote_qty: Decimal,
    pub time: i64,
    pub is_buyer_maker: bool,
}

/// Current average price over a rolling window (GET /api/v3/avgPrice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvgPrice {
    /// Window length in minutes (5 for the spot API).
    pub mins: u32,
    pub price: Decimal,
}

/// Best bid/ask with quantities (GET /api/v3/ticker/bookTicker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTicker {
    pub symbol: String,
    pub bid_price: Decimal,
    pub bid_qty: Decimal,
    pub ask_price: Decimal,
    pub ask_qty: Decimal,
}

/// One OHLCV candle (GET /api/v3/klines).
///
/// The endpoint returns an array-of-arrays; [`Kline::from_row`] parses one
/// row. Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, [7] quoteAssetVolume, [8] numberOfTrades,
///   [9] takerBuyBaseVolume, [10] takerBuyQuoteVolume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    pub open_time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub close_time: i64,
    pub quote_volume: Decimal,
    pub trade_count: u64,
    pub taker_buy_volume: Decimal,
    pub taker_buy_quote_volume: Decimal,
}

impl Kline {
    /// Parse one kline row from the array-of-arrays response format.
    pub fn from_row(row: &Value) -> SnapshotResult<Self> {
        let arr = row
            .as_array()
            .ok_or_else(|| SnapshotError::Response("kline entry is not an array".into()))?;

        if arr.len() < 11 {
            return Err(SnapshotError::Response(format!(
                "kline entry has {} fields, expected at least 11",
                arr.len()
            )));
        }

        Ok(Self {
            open_time: int_field(&arr[0], "openTime")?,
            open: decimal_field(&arr[1], "open")?,
            high: decimal_field(&arr[2], "high")?,
            low: decimal_field(&arr[3], "low")?,
            close: decimal_field(&arr[4], "close")?,
            volume: decimal_field(&arr[5], "volume")?,
            close_time: int_field(&arr[6], "closeTime")?,
            quote_volume: decimal_field(&arr[7], "quoteAssetVolume")?,
            trade_count: uint_field(&arr[8], "numberOfTrades")?,
            taker_buy_volume: decimal_field(&arr[9], "takerBuyBaseVolume")?,
            taker_buy_quote_volume: decimal_field(&arr[10], "takerBuyQuoteVolume")?,
        })
    }
}

// -----------------------------------------------------------------------------
// Field helpers for the array-encoded kline rows
// -----------------------------------------------------------------------------

/// Parse a JSON value that may be either a string or a number into `Decimal`.
fn decimal_field(val: &Value, name: &str) -> SnapshotResult<Decimal> {
    match val {
        Value::String(s) => s.parse::<Decimal>().map_err(|e| {
            SnapshotError::Response(format!("kline field {name}: cannot parse '{s}': {e}"))
        }),
        Value::Number(n) => n.to_string().parse::<Decimal>().map_err(|e| {
            SnapshotError::Response(format!("kline field {name}: cannot parse '{n}': {e}"))
        }),
        other => Err(SnapshotError::Response(format!(
            "kline field {name}: expected string or number, got {other}"
        ))),
    }
}

fn int_field(val: &Value, name: &str) -> SnapshotResult<i64> {
    val.as_i64().ok_or_else(|| {
        SnapshotError::Response(format!("kline field {name}: expected integer, got {val}"))
    })
}

fn uint_field(val: &Value, name: &str) -> SnapshotResult<u64> {
    val.as_u64().ok_or_else(|| {
        SnapshotError::Response(format!("kline field {name}: expected unsigned integer, got {val}"))
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn price_tick_parses_string_price() {
        let tick: PriceTick =
            serde_json::from_value(json!({"symbol": "ETHUSDT", "price": "3500.50"})).unwrap();
        assert_eq!(tick.symbol, "ETHUSDT");
        assert_eq!(tick.price, dec!(3500.50));
    }

    #[test]
    fn ticker_24h_parses_full_payload() {
        let ticker: Ticker24h = serde_json::from_value(json!({
            "symbol": "ETHUSDT",
            "priceChange": "50.00",
            "priceChangePercent": "1.500",
            "weightedAvgPrice": "3480.00",
            "prevClosePrice": "3450.00",
            "lastPrice": "3500.00",
            "bidPrice": "3499.00",
            "askPrice": "3501.00",
            "openPrice": "3450.00",
            "highPrice": "3550.00",
            "lowPrice": "3400.00",
            "volume": "10000.00",
            "quoteVolume": "35000000.00",
            "openTime": 1699999999000i64,
            "closeTime": 1700099999000i64,
            "count": 50000
        }))
        .unwrap();
        assert_eq!(ticker.price_change, dec!(50.00));
        assert_eq!(ticker.price_change_percent, dec!(1.500));
        assert_eq!(ticker.last_price, dec!(3500.00));
        assert_eq!(ticker.trade_count, 50000);
    }

    #[test]
    fn ticker_24h_missing_field_is_an_error() {
        // lastPrice absent: the record must not silently default.
        let result: Result<Ticker24h, _> = serde_json::from_value(json!({
            "symbol": "ETHUSDT",
            "priceChange": "50.00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn order_book_parses_level_pairs() {
        let book: OrderBook = serde_json::from_value(json!({
            "lastUpdateId": 12345678,
            "bids": [["3499.00", "1.5"], ["3498.00", "2.0"]],
            "asks": [["3501.00", "1.0"], ["3502.00", "2.5"]]
        }))
        .unwrap();
        assert_eq!(book.last_update_id, 12345678);
        assert_eq!(book.bids[0].price, dec!(3499.00));
        assert_eq!(book.bids[0].qty, dec!(1.5));
        assert_eq!(book.asks[1].qty, dec!(2.5));
    }

    #[test]
    fn book_level_reserialises_as_pair() {
        let level = BookLevel {
            price: dec!(3499.00),
            qty: dec!(1.5),
        };
        let json = serde_json::to_value(&level).unwrap();
        assert_eq!(json, json!(["3499.00", "1.5"]));
    }

    #[test]
    fn recent_trade_parses_maker_flag() {
        let trade: RecentTrade = serde_json::from_value(json!({
            "id": 123456,
            "price": "3500.00",
            "qty": "0.5",
            "quoteQty": "1750.00",
            "time": 1700000000000i64,
            "isBuyerMaker": false
        }))
        .unwrap();
        assert_eq!(trade.id, 123456);
        assert_eq!(trade.qty, dec!(0.5));
        assert!(!trade.is_buyer_maker);
    }

    #[test]
    fn avg_price_parses_window() {
        let avg: AvgPrice =
            serde_json::from_value(json!({"mins": 5, "price": "3495.50"})).unwrap();
        assert_eq!(avg.mins, 5);
        assert_eq!(avg.price, dec!(3495.50));
    }

    #[test]
    fn book_ticker_parses_both_sides() {
        let bt: BookTicker = serde_json::from_value(json!({
            "symbol": "ETHUSDT",
            "bidPrice": "3499.00",
            "bidQty": "10.5",
            "askPrice": "3501.00",
            "askQty": "8.2"
        }))
        .unwrap();
        assert_eq!(bt.bid_price, dec!(3499.00));
        assert_eq!(bt.ask_qty, dec!(8.2));
    }

    #[test]
    fn kline_parses_array_row() {
        let row = json!([
            1700000000000i64,
            "3400.00",
            "3550.00",
            "3380.00",
            "3500.00",
            "1000.00",
            1700003600000i64,
            "3500000.00",
            5000,
            "600.00",
            "2100000.00",
            "0"
        ]);
        let kline = Kline::from_row(&row).unwrap();
        assert_eq!(kline.open_time, 1700000000000);
        assert_eq!(kline.open, dec!(3400.00));
        assert_eq!(kline.high, dec!(3550.00));
        assert_eq!(kline.close, dec!(3500.00));
        assert_eq!(kline.trade_count, 5000);
        assert_eq!(kline.taker_buy_quote_volume, dec!(2100000.00));
    }

    #[test]
    fn short_kline_row_is_an_error() {
        let row = json!([1700000000000i64, "3400.00"]);
        assert!(matches!(
            Kline::from_row(&row),
            Err(SnapshotError::Response(_))
        ));
    }

    #[test]
    fn non_array_kline_row_is_an_error() {
        let row = json!({"open": "3400.00"});
        assert!(matches!(
            Kline::from_row(&row),
            Err(SnapshotError::Response(_))
        ));
    }
}
