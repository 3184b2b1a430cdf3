use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//transaction side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

//an executed trade, immutable once recorded
//field order matches the transactions csv column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: Action,
    pub quantity: u32,
    pub price: f64,
    pub value: f64,
}

impl Transaction {
    pub fn new(
        timestamp: DateTime<Utc>,
        symbol: String,
        action: Action,
        quantity: u32,
        price: f64,
    ) -> Self {
        Transaction {
            timestamp,
            symbol,
            action,
            quantity,
            price,
            value: quantity as f64 * price,
        }
    }
}
