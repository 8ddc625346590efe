use log::debug;
use rust_decimal::Decimal;

use super::types::{AlertDecision, PriceFilter, StrategyConfig, Thresholds};

/// Two-stage decision on the long-timeframe oscillator value.
///
/// The price filter is checked first and suppresses any signal. The
/// short-timeframe value is carried along for display only.
pub fn decide(
    short_value: f64,
    long_value: f64,
    current_price: Decimal,
    thresholds: &Thresholds,
    price_filter: &PriceFilter,
) -> AlertDecision {
    if !price_filter.contains(current_price) {
        debug!("Price {} outside filter {}, suppressing", current_price, price_filter);
        return AlertDecision::None;
    }

    if long_value.is_nan() {
        return AlertDecision::None;
    }

    if long_value <= thresholds.lower() {
        AlertDecision::Buy {
            price: current_price,
            short_value,
            long_value,
        }
    } else if long_value >= thresholds.upper() {
        AlertDecision::Sell {
            price: current_price,
            short_value,
            long_value,
        }
    } else {
        AlertDecision::None
    }
}

pub struct StrategyAnalyzer {
    config: StrategyConfig,
}

impl StrategyAnalyzer {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn analyze(&self, short_value: f64, long_value: f64, current_price: Decimal) -> AlertDecision {
        decide(
            short_value,
            long_value,
            current_price,
            &self.config.thresholds,
            &self.config.price_filter,
        )
    }

    /// True when the filter alone would hide a signal the thresholds produce.
    pub fn is_suppressed(&self, long_value: f64, current_price: Decimal) -> bool {
        let unfiltered = decide(
            f64::NAN,
            long_value,
            current_price,
            &self.config.thresholds,
            &PriceFilter::default(),
        );
        !unfiltered.is_none() && !self.config.price_filter.contains(current_price)
    }
}
