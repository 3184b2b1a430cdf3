pub mod performance;

pub use performance::{
    drawdown_series, periodic_returns, PerformanceReport, DEFAULT_RISK_FREE_RATE,
    TRADING_DAYS_PER_YEAR,
};
