use std::fmt;

use rust_decimal::Decimal;

use crate::strategy::SignalAction;

/// What happened to one instrument in a cycle, short of a failure.
#[derive(Clone, Debug, PartialEq)]
pub enum InstrumentOutcome {
    /// Long-timeframe oscillator inside the threshold band.
    NoSignal { short_value: f64, long_value: f64 },
    /// Not enough candles for a defined long-timeframe value.
    InsufficientData { candles: usize, required: usize },
    /// A signal existed but the price filter hid it.
    Suppressed { price: Decimal, long_value: f64 },
    /// Signal computed; `delivered` is false in dry-run mode.
    Alerted { action: SignalAction, delivered: bool },
}

/// Per-cycle counters, reported once the cycle completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub alerts: usize,
    pub failures: usize,
}

impl RunSummary {
    pub fn record_outcome(&mut self, outcome: &InstrumentOutcome) {
        self.processed += 1;
        if let InstrumentOutcome::Alerted { delivered: true, .. } = outcome {
            self.alerts += 1;
        }
    }

    pub fn record_fetch_failure(&mut self) {
        self.failures += 1;
    }

    // The instrument was evaluated; only delivery failed.
    pub fn record_delivery_failure(&mut self) {
        self.processed += 1;
        self.failures += 1;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed={} alerts={} failures={}",
            self.processed, self.alerts, self.failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_follow_outcomes() {
        let mut summary = RunSummary::default();
        summary.record_outcome(&InstrumentOutcome::NoSignal {
            short_value: 50.0,
            long_value: 50.0,
        });
        summary.record_outcome(&InstrumentOutcome::Alerted {
            action: SignalAction::Sell,
            delivered: true,
        });
        summary.record_outcome(&InstrumentOutcome::Alerted {
            action: SignalAction::Buy,
            delivered: false,
        });
        summary.record_fetch_failure();
        summary.record_delivery_failure();

        assert_eq!(
            summary,
            RunSummary {
                processed: 4,
                alerts: 1,
                failures: 2
            }
        );
        assert_eq!(summary.to_string(), "processed=4 alerts=1 failures=2");
    }
}
