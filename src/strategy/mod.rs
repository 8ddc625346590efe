mod analyzer;
mod types;

pub use analyzer::{decide, StrategyAnalyzer};
pub use types::{AlertDecision, PriceFilter, SignalAction, StrategyConfig, Thresholds};
