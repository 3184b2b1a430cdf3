pub mod ma_crossover;
pub mod rsi_reversion;

use crate::data::Bar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ma_crossover::MaCrossover;
pub use rsi_reversion::RsiReversion;

//per-bar directional instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    //numeric form (+1 buy, -1 sell, 0 hold)
    pub fn as_int(&self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("Cannot generate signals for an empty price history")]
    EmptyHistory,
}

//signal provider interface
//runs once over the full history before the simulation starts and must
//return exactly one signal per input bar
pub trait SignalProvider: Send {
    //returns the provider name (used in report filenames)
    fn name(&self) -> &str;

    //maps the price history to an aligned signal series
    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError>;
}

//rolling mean over a trailing window, with a shorter window at the start
//of the series (mirrors a min-periods-of-one rolling mean)
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut means = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        means.push(slice.iter().sum::<f64>() / slice.len() as f64);
    }

    means
}

//relative strength index over the trailing period ending at the last price
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if prices.len() < period + 1 {
        return None;
    }

    let mut gains = Vec::new();
    let mut losses = Vec::new();

    for i in 1..prices.len() {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(-change);
        }
    }

    let avg_gain: f64 = gains.iter().rev().take(period).sum::<f64>() / period as f64;
    let avg_loss: f64 = losses.iter().rev().take(period).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
