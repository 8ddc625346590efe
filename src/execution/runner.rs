use chrono::Utc;
use log::{error, info, warn};
use tokio::time::Duration;

use super::clients::CandleSource;
use super::error::{AlertError, DeliveryError, FetchError};
use super::retry::{RetryConfig, RetryHandler};
use super::types::{InstrumentOutcome, RunSummary};
use crate::bot::message::{self, AlertContext};
use crate::bot::Notifier;
use crate::config::InstrumentSelection;
use crate::rsi::{compute_oscillator, PriceSeries, RsiSettings};
use crate::strategy::{StrategyAnalyzer, StrategyConfig};

#[derive(Clone, Debug)]
pub struct RunSettings {
    pub rsi: RsiSettings,
    pub strategy: StrategyConfig,
    /// Pause after every instrument, success or not.
    pub request_interval: Duration,
    pub dry_run: bool,
}

/// One stateless evaluation pass over a list of instruments.
pub struct AlertRunner<S, N> {
    source: S,
    notifier: N,
    analyzer: StrategyAnalyzer,
    rsi: RsiSettings,
    retry_handler: RetryHandler,
    request_interval: Duration,
    dry_run: bool,
}

impl<S: CandleSource, N: Notifier> AlertRunner<S, N> {
    pub fn new(source: S, notifier: N, settings: RunSettings) -> Self {
        Self {
            source,
            notifier,
            analyzer: StrategyAnalyzer::new(settings.strategy),
            rsi: settings.rsi,
            retry_handler: RetryHandler::new(RetryConfig::default()),
            request_interval: settings.request_interval,
            dry_run: settings.dry_run,
        }
    }

    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry_handler = RetryHandler::new(config);
        self
    }

    pub async fn resolve_instruments(
        &self,
        selection: &InstrumentSelection,
    ) -> Result<Vec<String>, FetchError> {
        match selection {
            InstrumentSelection::List(instruments) => Ok(instruments.clone()),
            InstrumentSelection::AllKrw => self.source.list_instruments().await,
        }
    }

    /// Evaluates every instrument in order. Failures are counted and logged,
    /// never propagated.
    pub async fn run_cycle(&self, instruments: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for instrument in instruments {
            match self.evaluate_instrument(instrument).await {
                Ok(outcome) => {
                    log_outcome(instrument, &outcome);
                    summary.record_outcome(&outcome);
                }
                Err(err @ AlertError::Fetch { .. }) => {
                    error!("[{}] {} stage failed: {}", instrument, err.stage(), err);
                    summary.record_fetch_failure();
                }
                Err(err @ AlertError::Delivery { .. }) => {
                    warn!("[{}] {} stage failed: {}", instrument, err.stage(), err);
                    summary.record_delivery_failure();
                }
            }

            tokio::time::sleep(self.request_interval).await;
        }

        summary
    }

    pub async fn evaluate_instrument(&self, instrument: &str) -> Result<InstrumentOutcome, AlertError> {
        let short_series = self.fetch(instrument, self.rsi.short_interval_minutes).await?;
        let long_series = self.fetch(instrument, self.rsi.long_interval_minutes).await?;

        let short_rsi = compute_oscillator(&short_series, self.rsi.period, self.rsi.smoothing);
        let long_rsi = compute_oscillator(&long_series, self.rsi.period, self.rsi.smoothing);

        let insufficient = InstrumentOutcome::InsufficientData {
            candles: long_series.len(),
            required: self.rsi.period.get() + 1,
        };
        let Some(long_value) = long_rsi.latest() else {
            return Ok(insufficient);
        };
        let short_value = short_rsi.latest_raw();

        // the short timeframe closes more often, so its last close is fresher
        let Some(current_price) = short_series
            .last()
            .or_else(|| long_series.last())
            .map(|c| c.close_price)
        else {
            return Ok(insufficient);
        };

        if self.analyzer.is_suppressed(long_value, current_price) {
            return Ok(InstrumentOutcome::Suppressed {
                price: current_price,
                long_value,
            });
        }

        let decision = self.analyzer.analyze(short_value, long_value, current_price);
        let ctx = AlertContext {
            instrument,
            short_interval_minutes: self.rsi.short_interval_minutes,
            long_interval_minutes: self.rsi.long_interval_minutes,
            thresholds: &self.analyzer.config().thresholds,
            at: Utc::now(),
        };
        let (Some(action), Some(text)) = (decision.action(), message::render_alert(&decision, &ctx))
        else {
            return Ok(InstrumentOutcome::NoSignal {
                short_value,
                long_value,
            });
        };

        if self.dry_run {
            info!("[{}] dry run, not sending:\n{}", instrument, text);
            return Ok(InstrumentOutcome::Alerted {
                action,
                delivered: false,
            });
        }

        self.deliver(&text)
            .await
            .map_err(|source| AlertError::Delivery {
                instrument: instrument.to_string(),
                source,
            })?;

        info!(
            "ALERT sent: {} | {}m:{} {}m:{} | {}",
            instrument,
            self.rsi.short_interval_minutes,
            message::format_rsi(short_value),
            self.rsi.long_interval_minutes,
            message::format_rsi(long_value),
            message::format_price(current_price),
        );
        Ok(InstrumentOutcome::Alerted {
            action,
            delivered: true,
        })
    }

    /// Summary of the active configuration; no candles are fetched. Under
    /// `ALL` the market list is requested once so the count can be shown.
    pub async fn send_heartbeat(&self, selection: &InstrumentSelection) -> Result<(), DeliveryError> {
        let instrument_count = match selection {
            InstrumentSelection::List(instruments) => Some(instruments.len()),
            InstrumentSelection::AllKrw => match self.source.list_instruments().await {
                Ok(instruments) => Some(instruments.len()),
                Err(err) => {
                    warn!("Could not list KRW markets for heartbeat: {}", err);
                    None
                }
            },
        };
        let config = self.analyzer.config();
        let text = message::render_heartbeat(
            instrument_count,
            &config.thresholds,
            &config.price_filter,
            self.rsi.smoothing,
            Utc::now(),
        );

        if self.dry_run {
            info!("dry run, heartbeat not sent:\n{}", text);
            return Ok(());
        }

        self.deliver(&text).await?;
        info!("Heartbeat sent");
        Ok(())
    }

    async fn deliver(&self, text: &str) -> Result<String, DeliveryError> {
        self.retry_handler.retry(|| self.notifier.send(text)).await
    }

    async fn fetch(&self, instrument: &str, timeframe: u32) -> Result<PriceSeries, AlertError> {
        self.retry_handler
            .retry(|| {
                self.source
                    .fetch_candles(instrument, timeframe, self.rsi.candle_count)
            })
            .await
            .map_err(|source| AlertError::Fetch {
                instrument: instrument.to_string(),
                timeframe,
                source,
            })
    }
}

fn log_outcome(instrument: &str, outcome: &InstrumentOutcome) {
    match outcome {
        InstrumentOutcome::NoSignal {
            short_value,
            long_value,
        } => info!(
            "[{}] no signal (short {}, long {})",
            instrument,
            message::format_rsi(*short_value),
            message::format_rsi(*long_value)
        ),
        InstrumentOutcome::InsufficientData { candles, required } => warn!(
            "[{}] insufficient data: {} candles, need {}",
            instrument, candles, required
        ),
        InstrumentOutcome::Suppressed { price, long_value } => info!(
            "[{}] signal at RSI {} suppressed by price filter (price {})",
            instrument,
            message::format_rsi(*long_value),
            message::format_price(*price)
        ),
        InstrumentOutcome::Alerted { .. } => {}
    }
}
