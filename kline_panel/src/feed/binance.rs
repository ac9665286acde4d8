use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::BarSource;
use crate::bars::Bar;
use crate::error::FeedError;
use crate::interval::Interval;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Spot klines over the public REST API.
pub struct BinanceSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl BinanceSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn klines_url(&self, symbol: &str, interval: Interval, count: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={symbol}&interval={}&limit={count}",
            self.base_url,
            interval.as_str()
        )
    }
}

impl BarSource for BinanceSource {
    fn fetch(&mut self, symbol: &str, interval: Interval, count: usize) -> Result<Vec<Bar>, FeedError> {
        let url = self.klines_url(symbol, interval, count);
        debug!(%url, "requesting klines");

        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        parse_klines(&body, count)
    }
}

fn de_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

// [open_time, open, high, low, close, volume, close_time, ...]; prices are strings.
#[derive(Deserialize, Debug)]
struct FetchedKline(
    u64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
    #[serde(deserialize_with = "de_string_to_f64")] f64,
);

/// Decode a klines payload, keeping only the first `count` entries.
pub fn parse_klines(body: &str, count: usize) -> Result<Vec<Bar>, FeedError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body)?;
    rows.into_iter()
        .take(count)
        .map(|row| {
            let row = trim_row(row)?;
            let FetchedKline(_open_time, open, high, low, close) = serde_json::from_value(row)?;
            Ok(Bar::new(open, high, low, close))
        })
        .collect()
}

// Only the first five columns matter; the tuple struct cannot take the tail.
fn trim_row(row: serde_json::Value) -> Result<serde_json::Value, FeedError> {
    match row {
        serde_json::Value::Array(mut cols) if cols.len() >= 5 => {
            cols.truncate(5);
            Ok(serde_json::Value::Array(cols))
        }
        other => Err(FeedError::Decode(format!("unexpected kline row: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        [1700000000000,"100.5","101.0","99.0","100.8","12.3",1700003599999,"1234.5",42,"6.1","615.0","0"],
        [1700003600000,"100.8","102.5","100.1","102.0","8.0",1700007199999,"816.0",17,"4.0","408.0","0"],
        [1700007200000,"102.0","102.2","101.0","101.1","3.3",1700010799999,"333.0",9,"1.0","101.0","0"]
    ]"#;

    #[test]
    fn decodes_string_prices() {
        let bars = parse_klines(PAYLOAD, 30).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0], Bar::new(100.5, 101.0, 99.0, 100.8));
        assert_eq!(bars[2].close, 101.1);
    }

    #[test]
    fn keeps_only_requested_count() {
        let bars = parse_klines(PAYLOAD, 2).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 102.0);
    }

    #[test]
    fn rejects_error_objects_and_short_rows() {
        assert!(matches!(
            parse_klines(r#"{"code":-1121,"msg":"Invalid symbol."}"#, 30),
            Err(FeedError::Decode(_))
        ));
        assert!(matches!(
            parse_klines(r#"[[1,"1","2"]]"#, 30),
            Err(FeedError::Decode(_))
        ));
        assert!(matches!(
            parse_klines(r#"[[1,"x","2","0","1"]]"#, 30),
            Err(FeedError::Decode(_))
        ));
    }

    #[test]
    fn url_uses_exchange_interval_names() {
        let src = BinanceSource::new("https://example.test/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            src.klines_url("BTCUSDT", Interval::H4, 30),
            "https://example.test/api/v3/klines?symbol=BTCUSDT&interval=4h&limit=30"
        );
    }
}
