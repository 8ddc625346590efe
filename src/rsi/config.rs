use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Exponential smoothing convention applied to gains and losses.
///
/// The two conventions are not interchangeable: for identical input they
/// produce materially different oscillator values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Smoothing {
    /// Decay expressed as center of mass `period - 1` (alpha = 1/period),
    /// using the bias-adjusted weighted mean over all observations so far.
    #[default]
    CenterOfMass,
    /// Wilder's recursion, alpha = 1/period, seeded with the simple mean
    /// of the first `period` changes.
    Wilder,
}

impl FromStr for Smoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "com" | "center-of-mass" | "ewm" => Ok(Smoothing::CenterOfMass),
            "wilder" | "rma" => Ok(Smoothing::Wilder),
            other => Err(format!("unknown smoothing convention: {other}")),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::CenterOfMass => write!(f, "center-of-mass"),
            Smoothing::Wilder => write!(f, "wilder"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RsiSettings {
    pub period: NonZeroUsize,
    pub smoothing: Smoothing,
    pub short_interval_minutes: u32,
    pub long_interval_minutes: u32,
    pub candle_count: usize,
}

impl RsiSettings {
    pub const DEFAULT_PERIOD: usize = 14;
    pub const DEFAULT_SHORT_INTERVAL: u32 = 60;
    pub const DEFAULT_LONG_INTERVAL: u32 = 240;
    /// Upbit returns at most 200 candles per request.
    pub const MAX_CANDLE_COUNT: usize = 200;
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            period: NonZeroUsize::new(Self::DEFAULT_PERIOD).unwrap_or(NonZeroUsize::MIN),
            smoothing: Smoothing::default(),
            short_interval_minutes: Self::DEFAULT_SHORT_INTERVAL,
            long_interval_minutes: Self::DEFAULT_LONG_INTERVAL,
            candle_count: Self::MAX_CANDLE_COUNT,
        }
    }
}
