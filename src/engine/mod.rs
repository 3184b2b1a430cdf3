pub mod backtest;
pub mod transaction;

pub use backtest::{BacktestConfig, BacktestError, BacktestResult, Backtester, Ledger, PortfolioPoint};
pub use transaction::{Action, Transaction};
