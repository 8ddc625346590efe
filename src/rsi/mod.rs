mod calculator;
mod config;
mod types;

pub use calculator::{compute_oscillator, rsi_from_closes};
pub use config::{RsiSettings, Smoothing};
pub use types::{Candle, OscillatorSeries, PriceSeries};
