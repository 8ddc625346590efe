use chrono::NaiveDateTime;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

/// One closed candle. Only the closing price feeds the oscillator.
#[derive(Clone, Debug, PartialEq)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub close_price: Decimal,
}

impl Candle {
    pub fn new(timestamp: NaiveDateTime, close_price: Decimal) -> Self {
        Self {
            timestamp,
            close_price,
        }
    }
}

/// Candles for one instrument and one timeframe, ascending by timestamp.
///
/// Construction sorts the input and drops repeated timestamps (the first
/// occurrence wins), so the series is strictly increasing. Gaps are left
/// as they are.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by_key(|c| c.timestamp);
        Self { candles }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Most recent candle, if any.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles
            .iter()
            .map(|c| c.close_price.to_f64().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Oscillator values aligned index-for-index with a [`PriceSeries`].
///
/// Entries before warm-up are NaN.
#[derive(Clone, Debug, Default)]
pub struct OscillatorSeries {
    values: Vec<f64>,
}

impl OscillatorSeries {
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| !v.is_nan())
    }

    /// Value at the last index, `None` if the series has not warmed up.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().filter(|v| !v.is_nan())
    }

    /// Like [`latest`](Self::latest) but NaN when undefined.
    pub fn latest_raw(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }
}
