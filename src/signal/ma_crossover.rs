use crate::data::Bar;
use crate::signal::{rolling_mean, Signal, SignalError, SignalProvider};

//moving average crossover provider
//buy where the short mean crosses above the long mean, sell where it
//crosses below, hold everywhere else
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short_window: usize,
    long_window: usize,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        MaCrossover {
            short_window,
            long_window,
        }
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        MaCrossover::new(20, 50)
    }
}

impl SignalProvider for MaCrossover {
    fn name(&self) -> &str {
        "MaCrossover"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        if bars.is_empty() {
            return Err(SignalError::EmptyHistory);
        }

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let short_ma = rolling_mean(&closes, self.short_window);
        let long_ma = rolling_mean(&closes, self.long_window);

        let mut signals = Vec::with_capacity(bars.len());

        //no prior bar to compare against at index 0
        signals.push(Signal::Hold);

        for i in 1..bars.len() {
            let crossed_above = short_ma[i - 1] < long_ma[i - 1] && short_ma[i] > long_ma[i];
            let crossed_below = short_ma[i - 1] > long_ma[i - 1] && short_ma[i] < long_ma[i];

            let signal = if crossed_above {
                Signal::Buy
            } else if crossed_below {
                Signal::Sell
            } else {
                Signal::Hold
            };

            signals.push(signal);
        }

        Ok(signals)
    }
}
