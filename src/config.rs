use std::env;
use std::fmt::Display;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use rust_decimal::Decimal;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::rsi::{RsiSettings, Smoothing};
use crate::strategy::{PriceFilter, StrategyConfig, Thresholds};
use crate::upbit_config::{UpbitConfig, TELEGRAM_API_URL, UPBIT_API_URL};

/// Used when `SELECTED_COINS` is unset or empty.
pub const DEFAULT_SELECTED_COINS: &[&str] = &[
    "KRW-BTC", "KRW-ETH", "KRW-XRP", "KRW-SOL", "KRW-ADA", "KRW-SUI", "KRW-TRUMP", "KRW-USDT",
    "KRW-ATOM", "KRW-DOGE", "KRW-DOT", "KRW-AVAX", "KRW-LINK", "KRW-TRX", "KRW-ONDO", "KRW-JUP",
    "KRW-ME", "KRW-ASTR", "KRW-SEI", "KRW-SAND", "KRW-CTC", "KRW-GRT", "KRW-HBAR", "KRW-CRO",
    "KRW-ETC", "KRW-BONK", "KRW-VET", "KRW-VIRTUAL",
];

const DEFAULT_REQUEST_INTERVAL_SECS: f64 = 0.8;
const ALL_MARKETS: &str = "ALL";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstrumentSelection {
    List(Vec<String>),
    /// Every KRW market the exchange lists at run time.
    AllKrw,
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: Zeroizing<String>,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Everything one run needs, read once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub instruments: InstrumentSelection,
    pub request_interval: Duration,
    pub strategy: StrategyConfig,
    pub rsi: RsiSettings,
    pub endpoints: UpbitConfig,
}

impl AppConfig {
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Only the
    /// credentials are mandatory; every other value falls back to its
    /// default with a warning when it does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingCredential("BOT_TOKEN"))?;
        let chat_id = get("CHAT_ID").ok_or(ConfigError::MissingCredential("CHAT_ID"))?;

        let instruments = parse_instruments(get("SELECTED_COINS").as_deref());

        let interval_secs = parse_or(
            "REQUEST_INTERVAL",
            get("REQUEST_INTERVAL"),
            DEFAULT_REQUEST_INTERVAL_SECS,
        );
        let request_interval = Duration::try_from_secs_f64(interval_secs).unwrap_or_else(|_| {
            warn!("REQUEST_INTERVAL={} is not a valid delay, using default", interval_secs);
            Duration::from_secs_f64(DEFAULT_REQUEST_INTERVAL_SECS)
        });

        let thresholds = Thresholds::new(
            parse_or("RSI_LOWER", get("RSI_LOWER"), Thresholds::DEFAULT_LOWER),
            parse_or("RSI_UPPER", get("RSI_UPPER"), Thresholds::DEFAULT_UPPER),
        );
        let price_filter = PriceFilter::new(
            parse_optional::<Decimal>("PRICE_MIN", get("PRICE_MIN")),
            parse_optional::<Decimal>("PRICE_MAX", get("PRICE_MAX")),
        );
        if price_filter.is_empty_range() {
            warn!(
                "PRICE_MIN is above PRICE_MAX ({}), every alert will be suppressed",
                price_filter
            );
        }

        let defaults = RsiSettings::default();
        let period = NonZeroUsize::new(parse_or("RSI_PERIOD", get("RSI_PERIOD"), defaults.period.get()))
            .unwrap_or_else(|| {
                warn!("RSI_PERIOD must be at least 1, using {}", defaults.period);
                defaults.period
            });
        let mut candle_count = parse_or("CANDLE_COUNT", get("CANDLE_COUNT"), defaults.candle_count);
        if candle_count == 0 || candle_count > RsiSettings::MAX_CANDLE_COUNT {
            warn!(
                "CANDLE_COUNT={} outside 1..={}, clamping",
                candle_count,
                RsiSettings::MAX_CANDLE_COUNT
            );
            candle_count = candle_count.clamp(1, RsiSettings::MAX_CANDLE_COUNT);
        }
        let rsi = RsiSettings {
            period,
            smoothing: parse_or("RSI_SMOOTHING", get("RSI_SMOOTHING"), defaults.smoothing),
            short_interval_minutes: parse_or(
                "SHORT_INTERVAL",
                get("SHORT_INTERVAL"),
                defaults.short_interval_minutes,
            ),
            long_interval_minutes: parse_or(
                "LONG_INTERVAL",
                get("LONG_INTERVAL"),
                defaults.long_interval_minutes,
            ),
            candle_count,
        };

        let endpoints = UpbitConfig::custom(
            get("UPBIT_BASE_URL").unwrap_or_else(|| UPBIT_API_URL.to_string()),
            get("TELEGRAM_API_URL").unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            UpbitConfig::default().timeout,
        );

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: Zeroizing::new(bot_token),
                chat_id,
            },
            instruments,
            request_interval,
            strategy: StrategyConfig {
                thresholds,
                price_filter,
            },
            rsi,
            endpoints,
        })
    }
}

/// Comma-separated list, blanks dropped. `ALL` selects every KRW market.
pub fn parse_instruments(value: Option<&str>) -> InstrumentSelection {
    let Some(value) = value else {
        return default_selection();
    };
    if value.trim().eq_ignore_ascii_case(ALL_MARKETS) {
        return InstrumentSelection::AllKrw;
    }

    let list: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if list.is_empty() {
        default_selection()
    } else {
        InstrumentSelection::List(list)
    }
}

fn default_selection() -> InstrumentSelection {
    InstrumentSelection::List(DEFAULT_SELECTED_COINS.iter().map(|s| s.to_string()).collect())
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{}={:?} is not valid, using default {}", name, raw, default);
            default
        }),
    }
}

fn parse_optional<T: FromStr>(name: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{}={:?} is not valid, ignoring", name, raw);
            None
        }
    }
}
