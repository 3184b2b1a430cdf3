use crate::data::Bar;
use crate::engine::transaction::{Action, Transaction};
use crate::metrics::{periodic_returns, PerformanceReport, DEFAULT_RISK_FREE_RATE};
use crate::signal::{Signal, SignalError, SignalProvider};
use crate::sizing::SizingPolicy;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Price history too short: {0} bars (need at least 2)")]
    TooFewBars(usize),
    #[error("Initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),
    #[error("Timestamps not strictly increasing at bar {index}")]
    NonMonotonicTimestamps { index: usize },
    #[error("Signal series length {signals} does not match bar count {bars}")]
    SignalLengthMismatch { signals: usize, bars: usize },
    #[error(transparent)]
    Signal(#[from] SignalError),
}

//configuration for a backtest
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

//the cash/position pair owned by the engine for the run's duration
//cash stays >= 0: a buy that cannot be paid for is never executed, and
//positions are long only so sells always add cash
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub cash: f64,
    pub position: u32,
}

impl Ledger {
    fn new(initial_capital: f64) -> Self {
        Ledger {
            cash: initial_capital,
            position: 0,
        }
    }

    //mark-to-market value at the given price
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.position as f64 * price
    }
}

//one entry of the portfolio value series, aligned with the bars
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub portfolio_values: Vec<PortfolioPoint>,
    pub returns: Vec<f64>,
    pub transactions: Vec<Transaction>,
    pub report: PerformanceReport,
    pub ledger: Ledger,
}

//main simulation engine
//walks the history bar by bar, consulting the precomputed signals and
//the sizing policy, and mutating the ledger it exclusively owns
pub struct Backtester<'a> {
    symbol: String,
    bars: &'a [Bar],
    config: BacktestConfig,
}

impl<'a> Backtester<'a> {
    pub fn new(symbol: impl Into<String>, bars: &'a [Bar], config: BacktestConfig) -> Self {
        Backtester {
            symbol: symbol.into(),
            bars,
            config,
        }
    }

    //checks preconditions before any simulation state is created
    fn validate(&self) -> Result<(), BacktestError> {
        if self.bars.len() < 2 {
            return Err(BacktestError::TooFewBars(self.bars.len()));
        }

        if self.config.initial_capital <= 0.0 {
            return Err(BacktestError::NonPositiveCapital(self.config.initial_capital));
        }

        for i in 1..self.bars.len() {
            if self.bars[i].timestamp <= self.bars[i - 1].timestamp {
                return Err(BacktestError::NonMonotonicTimestamps { index: i });
            }
        }

        Ok(())
    }

    //runs the backtest
    pub fn run(
        &self,
        provider: &dyn SignalProvider,
        policy: &mut dyn SizingPolicy,
    ) -> Result<BacktestResult, BacktestError> {
        self.validate()?;

        //signals are generated once, up front, over the whole history
        let signals = provider.generate_signals(self.bars)?;
        if signals.len() != self.bars.len() {
            return Err(BacktestError::SignalLengthMismatch {
                signals: signals.len(),
                bars: self.bars.len(),
            });
        }

        let mut ledger = Ledger::new(self.config.initial_capital);
        let mut transactions: Vec<Transaction> = Vec::new();
        let mut portfolio_values = Vec::with_capacity(self.bars.len());

        //no trading happens before the first bar is observed
        portfolio_values.push(PortfolioPoint {
            timestamp: self.bars[0].timestamp,
            value: self.config.initial_capital,
        });

        for i in 1..self.bars.len() {
            let bar = &self.bars[i];
            let price = bar.close;

            //all execution happens at the bar's closing price
            match signals[i] {
                Signal::Buy => {
                    let desired = policy.desired_size(Signal::Buy, price);
                    let order_qty = desired.saturating_sub(ledger.position);

                    if order_qty > 0 {
                        let cost = order_qty as f64 * price;

                        //insufficient funds: skip the order, no partial fill
                        if ledger.cash >= cost {
                            ledger.position += order_qty;
                            ledger.cash -= cost;
                            transactions.push(Transaction::new(
                                bar.timestamp,
                                self.symbol.clone(),
                                Action::Buy,
                                order_qty,
                                price,
                            ));
                            policy.on_fill(bar.timestamp, &self.symbol, order_qty, price, true);
                        } else {
                            log::debug!(
                                "skipping buy of {} @ {} on {}: cost {:.2} exceeds cash {:.2}",
                                order_qty,
                                price,
                                bar.timestamp,
                                cost,
                                ledger.cash
                            );
                        }
                    }
                }
                Signal::Sell => {
                    let desired = policy.desired_size(Signal::Sell, price);

                    //clamp to the held position, shorting is not modeled
                    let close_qty = ledger.position.min(desired);

                    if close_qty > 0 {
                        let proceeds = close_qty as f64 * price;
                        ledger.position -= close_qty;
                        ledger.cash += proceeds;
                        transactions.push(Transaction::new(
                            bar.timestamp,
                            self.symbol.clone(),
                            Action::Sell,
                            close_qty,
                            price,
                        ));
                        policy.on_fill(bar.timestamp, &self.symbol, close_qty, price, false);
                    }
                }
                Signal::Hold => {}
            }

            //recorded every bar, trade or not
            portfolio_values.push(PortfolioPoint {
                timestamp: bar.timestamp,
                value: ledger.value_at(price),
            });
        }

        let values: Vec<f64> = portfolio_values.iter().map(|p| p.value).collect();
        let returns = periodic_returns(&values);
        let report = PerformanceReport::analyze(&returns, self.config.risk_free_rate);

        log::info!(
            "backtest complete: {} bars, {} transactions, final value {:.2}",
            self.bars.len(),
            transactions.len(),
            values.last().copied().unwrap_or(self.config.initial_capital)
        );

        Ok(BacktestResult {
            portfolio_values,
            returns,
            transactions,
            report,
            ledger,
        })
    }
}
