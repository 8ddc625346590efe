use std::num::NonZeroUsize;

use super::config::Smoothing;
use super::types::{OscillatorSeries, PriceSeries};

/// Relative strength index over the closing prices of `series`.
///
/// The output has the same length as the input. Index 0 never has a
/// value (no prior close), and the first defined value sits at index
/// `period`, so a series needs `period + 1` candles before
/// [`OscillatorSeries::latest`] returns something.
///
/// ```text
/// gain  = max(close[i] - close[i-1], 0)
/// loss  = max(close[i-1] - close[i], 0)
/// RSI   = 100 × avg_gain / (avg_gain + avg_loss)
/// ```
///
/// A window with neither gains nor losses reads 50; a window with gains
/// and no losses reads 100.
pub fn compute_oscillator(
    series: &PriceSeries,
    period: NonZeroUsize,
    smoothing: Smoothing,
) -> OscillatorSeries {
    rsi_from_closes(&series.closes(), period, smoothing)
}

pub fn rsi_from_closes(
    closes: &[f64],
    period: NonZeroUsize,
    smoothing: Smoothing,
) -> OscillatorSeries {
    let mut values = vec![f64::NAN; closes.len()];
    if closes.len() < 2 {
        return OscillatorSeries::from_values(values);
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let avg_gains = smooth(&gains, period.get(), smoothing);
    let avg_losses = smooth(&losses, period.get(), smoothing);

    for (i, (gain, loss)) in avg_gains.iter().zip(&avg_losses).enumerate() {
        // deltas are shifted one slot to the right of the closes
        values[i + 1] = rsi_value(*gain, *loss);
    }

    OscillatorSeries::from_values(values)
}

fn smooth(xs: &[f64], period: usize, smoothing: Smoothing) -> Vec<f64> {
    match smoothing {
        Smoothing::CenterOfMass => center_of_mass_mean(xs, period),
        Smoothing::Wilder => wilder_mean(xs, period),
    }
}

/// Bias-adjusted exponentially weighted mean with alpha = 1/period.
/// Observation `k` steps back carries weight `(1 - alpha)^k`.
fn center_of_mass_mean(xs: &[f64], period: usize) -> Vec<f64> {
    let decay = 1.0 - 1.0 / period as f64;
    let mut out = vec![f64::NAN; xs.len()];
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (k, &x) in xs.iter().enumerate() {
        weighted_sum = x + decay * weighted_sum;
        weight_total = 1.0 + decay * weight_total;
        if k + 1 >= period {
            out[k] = weighted_sum / weight_total;
        }
    }
    out
}

fn wilder_mean(xs: &[f64], period: usize) -> Vec<f64> {
    let length = period as f64;
    let mut out = vec![f64::NAN; xs.len()];
    let mut avg = 0.0;

    for (k, &x) in xs.iter().enumerate() {
        if k < period {
            avg += x;
            if k + 1 == period {
                avg /= length;
                out[k] = avg;
            }
        } else {
            avg = (avg * (length - 1.0) + x) / length;
            out[k] = avg;
        }
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 * avg_gain / (avg_gain + avg_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn period(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn assert_near(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    const BOTH: [Smoothing; 2] = [Smoothing::CenterOfMass, Smoothing::Wilder];

    #[test]
    fn output_is_aligned_with_input() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 7) as f64).collect();
        for smoothing in BOTH {
            let rsi = rsi_from_closes(&closes, period(14), smoothing);
            assert_eq!(rsi.len(), closes.len());
            assert!(rsi.values()[..14].iter().all(|v| v.is_nan()));
            assert!(rsi.values()[14..].iter().all(|v| (0.0..=100.0).contains(v)));
        }
    }

    #[test]
    fn constant_prices_read_fifty() {
        let closes = vec![250.0; 20];
        for smoothing in BOTH {
            let rsi = rsi_from_closes(&closes, period(14), smoothing);
            for v in &rsi.values()[14..] {
                assert_eq!(*v, 50.0);
            }
        }
    }

    #[test]
    fn rising_prices_read_one_hundred() {
        let closes: Vec<f64> = (0..40).map(|i| 10.0 + i as f64 * 0.5).collect();
        for smoothing in BOTH {
            let rsi = rsi_from_closes(&closes, period(14), smoothing);
            for v in &rsi.values()[14..] {
                assert_eq!(*v, 100.0);
            }
        }
    }

    #[test]
    fn falling_prices_read_zero() {
        let closes: Vec<f64> = (0..40).map(|i| 500.0 - i as f64 * 3.0).collect();
        for smoothing in BOTH {
            let rsi = rsi_from_closes(&closes, period(14), smoothing);
            for v in &rsi.values()[14..] {
                assert_eq!(*v, 0.0);
            }
        }
    }

    #[test]
    fn warm_up_needs_period_plus_one_closes() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        for smoothing in BOTH {
            let short = rsi_from_closes(&closes[..14], period(14), smoothing);
            assert_eq!(short.latest(), None);

            let exact = rsi_from_closes(&closes, period(14), smoothing);
            assert_eq!(exact.latest(), Some(100.0));
        }
    }

    #[test]
    fn tiny_inputs_are_undefined() {
        for smoothing in BOTH {
            assert!(rsi_from_closes(&[], period(3), smoothing).is_empty());
            let single = rsi_from_closes(&[42.0], period(1), smoothing);
            assert_eq!(single.len(), 1);
            assert_eq!(single.latest(), None);
        }
    }

    #[test]
    fn wilder_seed_and_recursion() {
        // changes: +2, -1, +2 → seed gain 4/3, loss 1/3
        let rsi = rsi_from_closes(&[10.0, 12.0, 11.0, 13.0, 12.0], period(3), Smoothing::Wilder);
        assert_near(rsi.get(3).unwrap(), 80.0);
        // next change -1 → gain 8/9, loss 5/9
        assert_near(rsi.get(4).unwrap(), 800.0 / 13.0);
    }

    #[test]
    fn center_of_mass_weights_recent_changes() {
        // alpha 1/3: gain = 26/19, loss = 6/19
        let rsi = rsi_from_closes(&[10.0, 12.0, 11.0, 13.0], period(3), Smoothing::CenterOfMass);
        assert_near(rsi.latest().unwrap(), 81.25);
    }

    #[test]
    fn conventions_disagree_on_mixed_input() {
        let closes = [10.0, 12.0, 11.0, 13.0];
        let com = rsi_from_closes(&closes, period(3), Smoothing::CenterOfMass);
        let wilder = rsi_from_closes(&closes, period(3), Smoothing::Wilder);
        assert!((com.latest().unwrap() - wilder.latest().unwrap()).abs() > 1.0);
    }

    #[test]
    fn period_one_tracks_last_change() {
        let rsi = rsi_from_closes(&[5.0, 6.0, 4.0, 4.0], period(1), Smoothing::Wilder);
        assert_eq!(rsi.get(1), Some(100.0));
        assert_eq!(rsi.get(2), Some(0.0));
        assert_eq!(rsi.get(3), Some(50.0));
    }
}
