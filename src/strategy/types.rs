use std::fmt;

use log::warn;
use rust_decimal::Decimal;

/// Oversold / overbought bounds on the long-timeframe oscillator.
///
/// Always satisfies `lower < upper`; anything else is replaced by
/// [`Thresholds::default`] at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    lower: f64,
    upper: f64,
}

impl Thresholds {
    pub const DEFAULT_LOWER: f64 = 35.0;
    pub const DEFAULT_UPPER: f64 = 70.0;

    pub fn new(lower: f64, upper: f64) -> Self {
        match Self::try_new(lower, upper) {
            Some(thresholds) => thresholds,
            None => {
                warn!(
                    "Invalid RSI thresholds lower={} upper={}, falling back to {}/{}",
                    lower,
                    upper,
                    Self::DEFAULT_LOWER,
                    Self::DEFAULT_UPPER
                );
                Self::default()
            }
        }
    }

    pub fn try_new(lower: f64, upper: f64) -> Option<Self> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if in_range(lower) && in_range(upper) && lower < upper {
            Some(Self { lower, upper })
        } else {
            None
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lower: Self::DEFAULT_LOWER,
            upper: Self::DEFAULT_UPPER,
        }
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lower, self.upper)
    }
}

/// Inclusive price bounds. A missing side is unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PriceFilter {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceFilter {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn is_configured(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// `min > max`: no price can pass, so every alert is suppressed.
    pub fn is_empty_range(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

impl fmt::Display for PriceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => write!(f, "off"),
            (Some(min), None) => write!(f, ">= {min}"),
            (None, Some(max)) => write!(f, "<= {max}"),
            (Some(min), Some(max)) => write!(f, "{min} ~ {max}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalAction {
    Buy,
    Sell,
}

impl SignalAction {
    pub fn label(&self) -> &'static str {
        match self {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
        }
    }
}

/// Outcome of one evaluation. Recomputed from scratch every cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum AlertDecision {
    None,
    Buy {
        price: Decimal,
        short_value: f64,
        long_value: f64,
    },
    Sell {
        price: Decimal,
        short_value: f64,
        long_value: f64,
    },
}

impl AlertDecision {
    pub fn action(&self) -> Option<SignalAction> {
        match self {
            AlertDecision::None => None,
            AlertDecision::Buy { .. } => Some(SignalAction::Buy),
            AlertDecision::Sell { .. } => Some(SignalAction::Sell),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AlertDecision::None)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyConfig {
    pub thresholds: Thresholds,
    pub price_filter: PriceFilter,
}
