//a Rust-based single-instrument strategy backtesting engine

pub mod config;
pub mod data;
pub mod engine;
pub mod metrics;
pub mod report;
pub mod signal;
pub mod sizing;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        BacktestConfiguration, MaParams, RsiParams, SizingParams, SizingType, StrategyParams,
        StrategyType,
    };
    pub use crate::data::{filter_by_symbol, load_csv, Bar};
    pub use crate::engine::{
        Action, BacktestConfig, BacktestError, BacktestResult, Backtester, Ledger, PortfolioPoint,
        Transaction,
    };
    pub use crate::metrics::{drawdown_series, periodic_returns, PerformanceReport};
    pub use crate::report::{ReportPaths, ReportSink};
    pub use crate::signal::{MaCrossover, RsiReversion, Signal, SignalProvider};
    pub use crate::sizing::{CapitalFraction, FixedSize, SizingPolicy};
}
