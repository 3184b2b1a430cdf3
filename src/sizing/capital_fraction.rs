use crate::signal::Signal;
use crate::sizing::SizingPolicy;
use chrono::{DateTime, Utc};

//capital fraction sizing
//spends a fixed fraction of its tracked free capital on each entry and
//closes its whole tracked holding on an exit; capital and holdings are
//updated from fill notifications
#[derive(Debug, Clone)]
pub struct CapitalFraction {
    fraction: f64,
    capital: f64,
    holdings: u32,
}

impl CapitalFraction {
    pub fn new(fraction: f64, initial_capital: f64) -> Self {
        CapitalFraction {
            fraction: fraction.clamp(0.0, 1.0),
            capital: initial_capital,
            holdings: 0,
        }
    }

    //free capital the policy believes it has left
    pub fn capital(&self) -> f64 {
        self.capital
    }
}

impl SizingPolicy for CapitalFraction {
    fn name(&self) -> &str {
        "CapitalFraction"
    }

    fn desired_size(&mut self, signal: Signal, price: f64) -> u32 {
        match signal {
            Signal::Buy => {
                if price <= 0.0 {
                    return 0;
                }
                //whole shares only
                let affordable = (self.fraction * self.capital / price).floor();
                //target size is on top of what is already held
                self.holdings + affordable as u32
            }
            Signal::Sell => self.holdings,
            Signal::Hold => 0,
        }
    }

    fn on_fill(
        &mut self,
        _timestamp: DateTime<Utc>,
        _symbol: &str,
        quantity: u32,
        price: f64,
        is_entry: bool,
    ) {
        let value = quantity as f64 * price;

        if is_entry {
            self.capital -= value;
            self.holdings += quantity;
        } else {
            self.capital += value;
            self.holdings = self.holdings.saturating_sub(quantity);
        }
    }
}
