pub mod capital_fraction;
pub mod fixed;

use crate::signal::Signal;
use chrono::{DateTime, Utc};

pub use capital_fraction::CapitalFraction;
pub use fixed::FixedSize;

//position sizing interface
//maps a signal and price to a desired absolute position size and observes
//fills to update any internal risk state; the engine stays agnostic to
//which concrete policy is supplied
pub trait SizingPolicy: Send {
    //returns the policy name (used in report filenames)
    fn name(&self) -> &str;

    //desired absolute position size for the given signal and price
    //buy answers "how large should the position be", sell answers
    //"how much may be closed"; always >= 0
    fn desired_size(&mut self, signal: Signal, price: f64) -> u32;

    //notifies the policy of an executed fill
    fn on_fill(
        &mut self,
        timestamp: DateTime<Utc>,
        symbol: &str,
        quantity: u32,
        price: f64,
        is_entry: bool,
    );
}
