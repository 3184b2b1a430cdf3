use crate::data::Bar;
use crate::signal::{rsi, Signal, SignalError, SignalProvider};

//rsi mean reversion provider
//buy when rsi drops below the oversold threshold, sell when it rises
//above the overbought threshold
#[derive(Debug, Clone)]
pub struct RsiReversion {
    lookback: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiReversion {
    pub fn new(lookback: usize, oversold: f64, overbought: f64) -> Self {
        RsiReversion {
            lookback,
            oversold,
            overbought,
        }
    }
}

impl Default for RsiReversion {
    fn default() -> Self {
        RsiReversion::new(14, 30.0, 70.0)
    }
}

impl SignalProvider for RsiReversion {
    fn name(&self) -> &str {
        "RsiReversion"
    }

    fn generate_signals(&self, bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        if bars.is_empty() {
            return Err(SignalError::EmptyHistory);
        }

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let mut signals = Vec::with_capacity(bars.len());

        for i in 0..closes.len() {
            //need lookback + 1 closes ending at this bar
            if i + 1 < self.lookback + 1 {
                signals.push(Signal::Hold);
                continue;
            }

            let window = &closes[i + 1 - (self.lookback + 1)..=i];
            let signal = match rsi(window, self.lookback) {
                Some(value) if value < self.oversold => Signal::Buy,
                Some(value) if value > self.overbought => Signal::Sell,
                _ => Signal::Hold,
            };

            signals.push(signal);
        }

        Ok(signals)
    }
}
