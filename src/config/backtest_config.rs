use crate::engine::BacktestConfig;
use crate::metrics::DEFAULT_RISK_FREE_RATE;
use crate::signal::{MaCrossover, RsiReversion, SignalProvider};
use crate::sizing::{CapitalFraction, FixedSize, SizingPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//strategy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    MaCrossover,
    RsiReversion,
}

impl StrategyType {
    //parse strategy type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ma" | "ma_crossover" => Some(StrategyType::MaCrossover),
            "rsi" | "rsi_reversion" => Some(StrategyType::RsiReversion),
            _ => None,
        }
    }
}

//sizing policy type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizingType {
    Fixed,
    CapitalFraction,
}

impl SizingType {
    //parse sizing type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "fixed_size" => Some(SizingType::Fixed),
            "fraction" | "capital_fraction" => Some(SizingType::CapitalFraction),
            _ => None,
        }
    }
}

//moving average crossover parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for MaParams {
    fn default() -> Self {
        MaParams {
            short_window: 20,
            long_window: 50,
        }
    }
}

//rsi reversion parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiParams {
    pub lookback: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            lookback: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

//strategy-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StrategyParams {
    Ma(MaParams),
    Rsi(RsiParams),
}

//sizing-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SizingParams {
    Fixed { position_size: u32 },
    Fraction { fraction: f64 },
}

//complete backtest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfiguration {
    //data
    pub data_path: PathBuf,
    pub symbol: String,

    //account settings
    pub initial_capital: f64,
    pub risk_free_rate: f64,

    //components
    pub strategy_params: StrategyParams,
    pub sizing_params: SizingParams,

    //artifact destination
    pub results_dir: PathBuf,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            data_path: PathBuf::from("data.csv"),
            symbol: "AAPL".to_string(),
            initial_capital: 100_000.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            strategy_params: StrategyParams::Ma(MaParams::default()),
            sizing_params: SizingParams::Fixed { position_size: 10 },
            results_dir: PathBuf::from("results"),
        }
    }
}

impl BacktestConfiguration {
    //load configuration from a json file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a json file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //constructs the configured signal provider
    pub fn build_provider(&self) -> Box<dyn SignalProvider> {
        match &self.strategy_params {
            StrategyParams::Ma(params) => {
                Box::new(MaCrossover::new(params.short_window, params.long_window))
            }
            StrategyParams::Rsi(params) => Box::new(RsiReversion::new(
                params.lookback,
                params.oversold,
                params.overbought,
            )),
        }
    }

    //constructs the configured sizing policy
    pub fn build_policy(&self) -> Box<dyn SizingPolicy> {
        match &self.sizing_params {
            SizingParams::Fixed { position_size } => Box::new(FixedSize::new(*position_size)),
            SizingParams::Fraction { fraction } => {
                Box::new(CapitalFraction::new(*fraction, self.initial_capital))
            }
        }
    }

    //engine-facing slice of the configuration
    pub fn engine_config(&self) -> BacktestConfig {
        BacktestConfig {
            initial_capital: self.initial_capital,
            risk_free_rate: self.risk_free_rate,
        }
    }
}
