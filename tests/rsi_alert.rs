use std::num::NonZeroUsize;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use upbit_rsi_alert::{
    compute_oscillator, decide, AlertDecision, Candle, PriceFilter, PriceSeries, Smoothing,
    Thresholds,
};

const PERIOD: usize = 14;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hourly(closes: &[Decimal]) -> PriceSeries {
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| Candle::new(start() + Duration::hours(i as i64), *c))
            .collect(),
    )
}

fn period() -> NonZeroUsize {
    NonZeroUsize::new(PERIOD).unwrap()
}

#[test]
fn fifteen_rising_closes_give_a_sell() {
    let closes: Vec<Decimal> = (100..115).map(Decimal::from).collect();
    let series = hourly(&closes);

    for smoothing in [Smoothing::CenterOfMass, Smoothing::Wilder] {
        let rsi = compute_oscillator(&series, period(), smoothing);
        let long_value = rsi.latest().expect("defined at period + 1 candles");
        assert_eq!(format!("{long_value:.1}"), "100.0");

        let decision = decide(
            long_value,
            long_value,
            dec!(114),
            &Thresholds::default(),
            &PriceFilter::default(),
        );
        assert_eq!(
            decision,
            AlertDecision::Sell {
                price: dec!(114),
                short_value: 100.0,
                long_value: 100.0
            }
        );
    }
}

#[test]
fn candles_arriving_newest_first_give_the_same_result() {
    let closes: Vec<Decimal> = [
        dec!(44.34), dec!(44.09), dec!(44.15), dec!(43.61), dec!(44.33), dec!(44.83),
        dec!(45.10), dec!(45.42), dec!(45.84), dec!(46.08), dec!(45.89), dec!(46.03),
        dec!(45.61), dec!(46.28), dec!(46.28), dec!(46.00), dec!(46.03), dec!(46.41),
    ]
    .to_vec();
    let ordered = hourly(&closes);

    let mut reversed: Vec<Candle> = ordered.candles().to_vec();
    reversed.reverse();
    let from_api = PriceSeries::new(reversed);

    let a = compute_oscillator(&ordered, period(), Smoothing::Wilder);
    let b = compute_oscillator(&from_api, period(), Smoothing::Wilder);
    assert_eq!(a.latest(), b.latest());

    let value = a.latest().unwrap();
    assert!((0.0..=100.0).contains(&value));
    assert!(value > 50.0, "mostly rising series, got {value}");
}

#[test]
fn one_candle_short_of_warm_up_is_undefined() {
    let closes: Vec<Decimal> = (0..PERIOD as i64).map(|i| Decimal::from(200 - i)).collect();
    let rsi = compute_oscillator(&hourly(&closes), period(), Smoothing::CenterOfMass);

    assert_eq!(rsi.len(), PERIOD);
    assert_eq!(rsi.latest(), None);
    assert!(decide(
        50.0,
        rsi.latest_raw(),
        dec!(187),
        &Thresholds::default(),
        &PriceFilter::default()
    )
    .is_none());
}

#[test]
fn filtered_price_hides_a_buy() {
    let closes: Vec<Decimal> = (0..30).map(|i| Decimal::from(6000 - i * 10)).collect();
    let rsi = compute_oscillator(&hourly(&closes), period(), Smoothing::CenterOfMass);
    let long_value = rsi.latest().unwrap();
    assert_eq!(long_value, 0.0);

    let filter = PriceFilter::new(Some(dec!(0)), Some(dec!(1000)));
    let decision = decide(long_value, long_value, dec!(5710), &Thresholds::default(), &filter);
    assert_eq!(decision, AlertDecision::None);
}
