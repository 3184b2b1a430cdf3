pub mod backtest_config;

pub use backtest_config::{
    BacktestConfiguration, MaParams, RsiParams, SizingParams, SizingType, StrategyParams,
    StrategyType,
};
