use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::execution::clients::KRW_MARKET_PREFIX;
use crate::rsi::Smoothing;
use crate::strategy::{AlertDecision, PriceFilter, SignalAction, Thresholds};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Everything an alert message shows besides the decision itself.
#[derive(Clone, Copy, Debug)]
pub struct AlertContext<'a> {
    pub instrument: &'a str,
    pub short_interval_minutes: u32,
    pub long_interval_minutes: u32,
    pub thresholds: &'a Thresholds,
    pub at: DateTime<Utc>,
}

/// Human-readable alert, `None` for [`AlertDecision::None`].
pub fn render_alert(decision: &AlertDecision, ctx: &AlertContext<'_>) -> Option<String> {
    let (price, short_value, long_value) = match decision {
        AlertDecision::None => return None,
        AlertDecision::Buy {
            price,
            short_value,
            long_value,
        }
        | AlertDecision::Sell {
            price,
            short_value,
            long_value,
        } => (*price, *short_value, *long_value),
    };
    let action = decision.action()?;
    let marker = match action {
        SignalAction::Buy => "🟢",
        SignalAction::Sell => "🔴",
    };

    Some(format!(
        "{} {} signal: {}\n\
        Price: {} KRW\n\
        RSI {}m: {} | {}m: {}\n\
        Thresholds: {}\n\
        Time: {}",
        marker,
        action.label(),
        display_name(ctx.instrument),
        format_price(price),
        ctx.short_interval_minutes,
        format_rsi(short_value),
        ctx.long_interval_minutes,
        format_rsi(long_value),
        ctx.thresholds,
        kst_timestamp(ctx.at),
    ))
}

pub fn render_heartbeat(
    instrument_count: Option<usize>,
    thresholds: &Thresholds,
    price_filter: &PriceFilter,
    smoothing: Smoothing,
    at: DateTime<Utc>,
) -> String {
    let instruments = match instrument_count {
        Some(count) => format!("{count}"),
        None => "all KRW markets".to_string(),
    };

    format!(
        "✅ RSI alert bot is running\n\
        Time: {}\n\
        Instruments: {}\n\
        Thresholds: {}\n\
        Price filter: {}\n\
        Smoothing: {}",
        kst_timestamp(at),
        instruments,
        thresholds,
        price_filter,
        smoothing,
    )
}

/// `KRW-BTC` → `BTC`.
pub fn display_name(instrument: &str) -> &str {
    instrument.strip_prefix(KRW_MARKET_PREFIX).unwrap_or(instrument)
}

/// One decimal place. Only used for display.
pub fn format_rsi(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.1}")
    }
}

/// Whole won with thousands separators; sub-100 prices keep up to four
/// decimals so low-priced coins don't collapse to zero.
pub fn format_price(price: Decimal) -> String {
    if price.abs() >= Decimal::ONE_HUNDRED {
        group_thousands(&price.trunc().to_string())
    } else {
        price.round_dp(4).normalize().to_string()
    }
}

pub fn kst_timestamp(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(KST_OFFSET_SECS) {
        Some(kst) => at.with_timezone(&kst).format("%Y-%m-%d %H:%M:%S KST").to_string(),
        None => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}
