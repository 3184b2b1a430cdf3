use crate::signal::Signal;
use crate::sizing::SizingPolicy;
use chrono::{DateTime, Utc};

//fixed position sizing
//targets a constant number of shares on a buy and allows the same
//amount to be closed on a sell
#[derive(Debug, Clone)]
pub struct FixedSize {
    size: u32,
}

impl FixedSize {
    pub fn new(size: u32) -> Self {
        FixedSize { size }
    }
}

impl Default for FixedSize {
    fn default() -> Self {
        FixedSize::new(10)
    }
}

impl SizingPolicy for FixedSize {
    fn name(&self) -> &str {
        "FixedSize"
    }

    fn desired_size(&mut self, signal: Signal, _price: f64) -> u32 {
        match signal {
            Signal::Buy | Signal::Sell => self.size,
            Signal::Hold => 0,
        }
    }

    fn on_fill(
        &mut self,
        _timestamp: DateTime<Utc>,
        _symbol: &str,
        _quantity: u32,
        _price: f64,
        _is_entry: bool,
    ) {
        //no internal state to track
    }
}
