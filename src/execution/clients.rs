use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::FetchError;
use crate::rsi::{Candle, PriceSeries};
use crate::upbit_config::UpbitConfig;

pub const KRW_MARKET_PREFIX: &str = "KRW-";

/// Market data the evaluation cycle depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Every KRW-quoted market identifier.
    async fn list_instruments(&self) -> Result<Vec<String>, FetchError>;

    /// Most recent `count` candles, ascending by timestamp.
    async fn fetch_candles(
        &self,
        instrument: &str,
        timeframe_minutes: u32,
        count: usize,
    ) -> Result<PriceSeries, FetchError>;
}

#[derive(Debug, Deserialize)]
struct MarketInfo {
    market: String,
}

#[derive(Debug, Deserialize)]
struct UpbitCandle {
    candle_date_time_utc: Option<NaiveDateTime>,
    trade_price: Option<Decimal>,
}

pub struct UpbitApiClient {
    config: UpbitConfig,
    http_client: reqwest::Client,
}

impl UpbitApiClient {
    pub fn new(config: UpbitConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CandleSource for UpbitApiClient {
    async fn list_instruments(&self) -> Result<Vec<String>, FetchError> {
        let request = self.http_client.get(self.config.markets_url());
        let markets = self.get(request).await?.json::<Vec<MarketInfo>>().await?;

        Ok(krw_markets(markets))
    }

    async fn fetch_candles(
        &self,
        instrument: &str,
        timeframe_minutes: u32,
        count: usize,
    ) -> Result<PriceSeries, FetchError> {
        let request = self
            .http_client
            .get(self.config.candles_url(timeframe_minutes))
            .query(&[("market", instrument.to_string()), ("count", count.to_string())]);

        let candles = self.get(request).await?.json::<Vec<UpbitCandle>>().await?;
        debug!("Fetched {} {}m candles for {}", candles.len(), timeframe_minutes, instrument);

        to_price_series(candles)
    }
}

fn krw_markets(markets: Vec<MarketInfo>) -> Vec<String> {
    markets
        .into_iter()
        .map(|m| m.market)
        .filter(|m| m.starts_with(KRW_MARKET_PREFIX))
        .collect()
}

// Upbit answers newest first; PriceSeries re-sorts.
fn to_price_series(raw: Vec<UpbitCandle>) -> Result<PriceSeries, FetchError> {
    if raw.is_empty() {
        return Err(FetchError::Empty);
    }

    let candles = raw
        .into_iter()
        .map(|c| {
            let timestamp = c
                .candle_date_time_utc
                .ok_or(FetchError::MissingField("candle_date_time_utc"))?;
            let close_price = c.trade_price.ok_or(FetchError::MissingField("trade_price"))?;
            if close_price <= Decimal::ZERO {
                return Err(FetchError::NonPositivePrice(close_price));
            }
            Ok(Candle::new(timestamp, close_price))
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(PriceSeries::new(candles))
}

fn truncate(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn candles_are_reordered_oldest_first() {
        let raw: Vec<UpbitCandle> = serde_json::from_str(
            r#"[
                {"market":"KRW-BTC","candle_date_time_utc":"2024-05-01T02:00:00","trade_price":95100000.0},
                {"market":"KRW-BTC","candle_date_time_utc":"2024-05-01T01:00:00","trade_price":95000000.0},
                {"market":"KRW-BTC","candle_date_time_utc":"2024-05-01T00:00:00","trade_price":94900000.0}
            ]"#,
        )
        .unwrap();

        let series = to_price_series(raw).unwrap();
        let closes: Vec<_> = series.candles().iter().map(|c| c.close_price).collect();
        assert_eq!(closes, vec![dec!(94900000), dec!(95000000), dec!(95100000)]);
    }

    #[test]
    fn missing_price_is_reported() {
        let raw: Vec<UpbitCandle> =
            serde_json::from_str(r#"[{"candle_date_time_utc":"2024-05-01T00:00:00"}]"#).unwrap();

        match to_price_series(raw) {
            Err(FetchError::MissingField(field)) => assert_eq!(field, "trade_price"),
            other => panic!("expected missing field, got {other:?}"),
        }
    }

    #[test]
    fn zero_or_negative_price_is_rejected() {
        for price in ["0", "-12.5"] {
            let raw: Vec<UpbitCandle> = serde_json::from_str(&format!(
                r#"[{{"candle_date_time_utc":"2024-05-01T00:00:00","trade_price":{price}}}]"#
            ))
            .unwrap();

            assert!(
                matches!(to_price_series(raw), Err(FetchError::NonPositivePrice(_))),
                "price {price} accepted"
            );
        }
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(matches!(to_price_series(Vec::new()), Err(FetchError::Empty)));
    }

    #[test]
    fn only_krw_markets_are_listed() {
        let markets: Vec<MarketInfo> = serde_json::from_str(
            r#"[{"market":"KRW-BTC"},{"market":"BTC-ETH"},{"market":"KRW-XRP"},{"market":"USDT-BTC"}]"#,
        )
        .unwrap();
        assert_eq!(krw_markets(markets), vec!["KRW-BTC", "KRW-XRP"]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("가나다라", 2), "가나");
    }
}
