use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use env_logger::{Env, Target};
use log::{error, info, warn};

use upbit_rsi_alert::{
    AlertRunner,
    AppConfig,
    RunSettings,
    TelegramNotifier,
    UpbitApiClient,
};

const EXIT_MISSING_CREDENTIALS: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Upbit RSI alert bot (one-shot)", long_about = None)]
struct Args {
    /// Send the daily heartbeat message instead of checking RSI
    #[arg(long)]
    heartbeat: bool,

    /// Evaluate and log, but do not send any message
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // stdout so the scheduler's journal keeps the run summary
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let args = Args::parse();

    let config = match AppConfig::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_MISSING_CREDENTIALS);
        }
    };

    let http_client = match config.endpoints.create_http_client() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = UpbitApiClient::new(config.endpoints.clone(), http_client.clone());
    let notifier = TelegramNotifier::new(
        http_client,
        &config.endpoints.telegram_url,
        config.telegram.bot_token.clone(),
        config.telegram.chat_id.clone(),
    );
    let runner = AlertRunner::new(
        source,
        notifier,
        RunSettings {
            rsi: config.rsi.clone(),
            strategy: config.strategy.clone(),
            request_interval: config.request_interval,
            dry_run: args.dry_run,
        },
    );

    if args.heartbeat {
        return match runner.send_heartbeat(&config.instruments).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                warn!("Heartbeat send failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let instruments = match runner.resolve_instruments(&config.instruments).await {
        Ok(instruments) => instruments,
        Err(e) => {
            error!("Failed to list markets: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Job start (UTC): {} | instruments: {} | thresholds: {} | smoothing: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
        instruments.len(),
        config.strategy.thresholds,
        config.rsi.smoothing
    );

    let summary = runner.run_cycle(&instruments).await;

    info!(
        "Job done (UTC): {} | {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
        summary
    );
    ExitCode::SUCCESS
}
