//! One-shot RSI threshold alerts for Upbit KRW markets.
//!
//! Each invocation fetches short- and long-timeframe candles per
//! instrument, computes the relative strength index, and sends a Telegram
//! message when the long-timeframe value crosses the configured bounds.
//! Scheduling is left to an external timer.

pub mod bot;
pub mod config;
pub mod execution;
pub mod rsi;
pub mod strategy;
pub mod upbit_config;

pub use upbit_config::UpbitConfig;

pub use bot::{Notifier, TelegramNotifier};

pub use config::{AppConfig, ConfigError, InstrumentSelection};

pub use execution::{
    AlertError,
    AlertRunner,
    CandleSource,
    RunSettings,
    RunSummary,
    UpbitApiClient,
};

pub use rsi::{
    compute_oscillator,
    Candle,
    OscillatorSeries,
    PriceSeries,
    Smoothing,
};

pub use strategy::{
    decide,
    AlertDecision,
    PriceFilter,
    Thresholds,
};
