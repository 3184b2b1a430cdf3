use chrono::{Duration, TimeZone, Utc};
use hindsight::prelude::*;
use hindsight::signal::SignalError;

//provider with a precomputed script, for deterministic scenarios
struct Scripted(Vec<Signal>);

impl SignalProvider for Scripted {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn generate_signals(&self, _bars: &[Bar]) -> Result<Vec<Signal>, SignalError> {
        Ok(self.0.clone())
    }
}

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Bar::new_unchecked(
                start + Duration::days(i as i64),
                close,
                close,
                close,
                close,
                0.0,
                "TEST".to_string(),
            )
        })
        .collect()
}

fn config(initial_capital: f64) -> BacktestConfig {
    BacktestConfig {
        initial_capital,
        ..BacktestConfig::default()
    }
}

fn values(result: &BacktestResult) -> Vec<f64> {
    result.portfolio_values.iter().map(|p| p.value).collect()
}

#[test]
fn insufficient_funds_skips_every_order() {
    //buy 10 @ 105 costs 1050, more than the 1000 on hand, so nothing trades
    let bars = bars_from_closes(&[100.0, 105.0, 95.0, 110.0]);
    let signals = vec![Signal::Hold, Signal::Buy, Signal::Hold, Signal::Sell];

    let result = Backtester::new("TEST", &bars, config(1000.0))
        .run(&Scripted(signals), &mut FixedSize::new(10))
        .unwrap();

    assert!(result.transactions.is_empty());
    assert_eq!(values(&result), vec![1000.0, 1000.0, 1000.0, 1000.0]);
    assert_eq!(result.ledger.cash, 1000.0);
    assert_eq!(result.ledger.position, 0);
    //flat portfolio: zero return, zero drawdown, undefined sharpe
    assert_eq!(result.report.total_return, 0.0);
    assert_eq!(result.report.max_drawdown, 0.0);
    assert!(result.report.sharpe_ratio.is_nan());
}

#[test]
fn sufficient_capital_executes_buy_then_sell() {
    let bars = bars_from_closes(&[100.0, 105.0, 95.0, 110.0]);
    let signals = vec![Signal::Hold, Signal::Buy, Signal::Hold, Signal::Sell];

    let result = Backtester::new("TEST", &bars, config(2000.0))
        .run(&Scripted(signals), &mut FixedSize::new(10))
        .unwrap();

    assert_eq!(values(&result), vec![2000.0, 2000.0, 1900.0, 2050.0]);
    assert_eq!(result.ledger.cash, 2050.0);
    assert_eq!(result.ledger.position, 0);

    assert_eq!(result.transactions.len(), 2);

    let buy = &result.transactions[0];
    assert_eq!(buy.action, Action::Buy);
    assert_eq!(buy.quantity, 10);
    assert_eq!(buy.price, 105.0);
    assert_eq!(buy.value, 1050.0);
    assert_eq!(buy.symbol, "TEST");

    let sell = &result.transactions[1];
    assert_eq!(sell.action, Action::Sell);
    assert_eq!(sell.quantity, 10);
    assert_eq!(sell.price, 110.0);
    assert_eq!(sell.value, 1100.0);
}

#[test]
fn portfolio_value_starts_at_initial_capital() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
    let bars = bars_from_closes(&closes);

    let result = Backtester::new("TEST", &bars, config(10_000.0))
        .run(&MaCrossover::new(5, 20), &mut FixedSize::new(10))
        .unwrap();

    assert_eq!(result.portfolio_values[0].value, 10_000.0);
    assert_eq!(result.portfolio_values.len(), bars.len());
}

#[test]
fn flat_signal_series_never_trades() {
    let bars = bars_from_closes(&[100.0, 90.0, 120.0, 80.0, 150.0]);
    let signals = vec![Signal::Hold; bars.len()];

    let result = Backtester::new("TEST", &bars, config(5000.0))
        .run(&Scripted(signals), &mut FixedSize::new(10))
        .unwrap();

    assert!(result.transactions.is_empty());
    assert!(values(&result).iter().all(|&v| v == 5000.0));
}

#[test]
fn identical_inputs_give_identical_outputs() {
    let closes: Vec<f64> = (0..80)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0 + i as f64 * 0.1)
        .collect();
    let bars = bars_from_closes(&closes);
    let provider = MaCrossover::new(5, 15);

    let first = Backtester::new("TEST", &bars, config(10_000.0))
        .run(&provider, &mut FixedSize::new(10))
        .unwrap();
    let second = Backtester::new("TEST", &bars, config(10_000.0))
        .run(&provider, &mut FixedSize::new(10))
        .unwrap();

    assert_eq!(first.transactions, second.transactions);
    assert_eq!(first.portfolio_values, second.portfolio_values);
}

//replays the transaction log against the bars and checks that every
//intermediate ledger state is consistent with the recorded value series
fn assert_ledger_consistency(bars: &[Bar], result: &BacktestResult, initial_capital: f64) {
    let mut cash = initial_capital;
    let mut position: u32 = 0;
    let mut tx_idx = 0;

    for (i, bar) in bars.iter().enumerate() {
        while tx_idx < result.transactions.len()
            && result.transactions[tx_idx].timestamp == bar.timestamp
        {
            let tx = &result.transactions[tx_idx];
            match tx.action {
                Action::Buy => {
                    //a buy is only recorded when cash covered it
                    assert!(cash >= tx.value, "buy at bar {} exceeded cash", i);
                    cash -= tx.value;
                    position += tx.quantity;
                }
                Action::Sell => {
                    //a sell never exceeds the held position
                    assert!(tx.quantity <= position, "sell at bar {} went short", i);
                    cash += tx.value;
                    position -= tx.quantity;
                }
            }
            tx_idx += 1;
        }

        assert!(cash >= 0.0, "cash went negative at bar {}", i);

        let expected = cash + position as f64 * bar.close;
        let recorded = result.portfolio_values[i].value;
        assert!(
            (expected - recorded).abs() < 1e-9,
            "valuation mismatch at bar {}: {} vs {}",
            i,
            expected,
            recorded
        );
    }

    assert_eq!(tx_idx, result.transactions.len());
    assert_eq!(cash, result.ledger.cash);
    assert_eq!(position, result.ledger.position);
}

#[test]
fn ledger_and_value_series_stay_consistent() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 50.0 + (i as f64 * 0.25).sin() * 20.0 + (i as f64 * 0.05).cos() * 7.0)
        .collect();
    let bars = bars_from_closes(&closes);

    let result = Backtester::new("TEST", &bars, config(3_000.0))
        .run(&RsiReversion::new(7, 35.0, 65.0), &mut FixedSize::new(25))
        .unwrap();

    assert_ledger_consistency(&bars, &result, 3_000.0);
}

#[test]
fn capital_fraction_policy_runs_end_to_end() {
    let closes: Vec<f64> = (0..80)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 15.0)
        .collect();
    let bars = bars_from_closes(&closes);
    let mut policy = CapitalFraction::new(0.5, 10_000.0);

    let result = Backtester::new("TEST", &bars, config(10_000.0))
        .run(&MaCrossover::new(4, 12), &mut policy)
        .unwrap();

    assert_ledger_consistency(&bars, &result, 10_000.0);
}

#[test]
fn returns_align_with_value_series() {
    let bars = bars_from_closes(&[100.0, 105.0, 95.0, 110.0]);
    let signals = vec![Signal::Hold, Signal::Buy, Signal::Hold, Signal::Sell];

    let result = Backtester::new("TEST", &bars, config(2000.0))
        .run(&Scripted(signals), &mut FixedSize::new(10))
        .unwrap();

    //one fewer return than bars, first-bar return discarded
    assert_eq!(result.returns.len(), bars.len() - 1);
    assert_eq!(result.returns[0], 0.0);
    assert!((result.returns[1] - (1900.0 / 2000.0 - 1.0)).abs() < 1e-12);
    assert!((result.returns[2] - (2050.0 / 1900.0 - 1.0)).abs() < 1e-12);
}
