use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//trading-days-per-year convention used for annualization
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//annualized risk-free rate used when none is supplied
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

//summary risk/return statistics for a backtest, immutable once produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
}

impl PerformanceReport {
    //derives the report from a series of periodic returns
    pub fn analyze(returns: &[f64], risk_free_rate: f64) -> Self {
        let total_return: f64 = returns.iter().map(|r| 1.0 + r).product::<f64>() - 1.0;

        let annualized_return = if returns.is_empty() {
            0.0
        } else {
            (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / returns.len() as f64) - 1.0
        };

        let excess: Vec<f64> = returns
            .iter()
            .map(|r| r - risk_free_rate / TRADING_DAYS_PER_YEAR)
            .collect();

        let std_dev = excess.as_slice().std_dev();
        let sharpe_ratio = if std_dev > 0.0 {
            (excess.as_slice().mean() / std_dev) * TRADING_DAYS_PER_YEAR.sqrt()
        } else {
            //zero or undefined variance: explicitly not a number
            f64::NAN
        };

        let max_drawdown = drawdown_series(returns)
            .into_iter()
            .fold(0.0_f64, f64::min);

        PerformanceReport {
            total_return,
            annualized_return,
            sharpe_ratio,
            max_drawdown,
        }
    }

    //metric names and rendered values, in report order
    pub fn formatted_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Return", format!("{:.2}%", self.total_return * 100.0)),
            (
                "Annualized Return",
                format!("{:.2}%", self.annualized_return * 100.0),
            ),
            ("Sharpe Ratio", format!("{:.2}", self.sharpe_ratio)),
            ("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0)),
        ]
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        for (name, value) in self.formatted_lines() {
            table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
        }

        table.printstd();
    }
}

//bar-over-bar percentage change, with the undefined first-bar return dropped
pub fn periodic_returns(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return vec![];
    }

    let mut returns = Vec::with_capacity(values.len() - 1);
    for i in 1..values.len() {
        returns.push((values[i] - values[i - 1]) / values[i - 1]);
    }
    returns
}

//per-period decline of cumulative return from its running peak
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut series = Vec::with_capacity(returns.len());
    let mut cumulative = 1.0_f64;
    let mut peak = f64::MIN;

    for r in returns {
        cumulative *= 1.0 + r;
        if cumulative > peak {
            peak = cumulative;
        }
        series.push(cumulative / peak - 1.0);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn all_zero_returns() {
        let report = PerformanceReport::analyze(&[0.0; 5], DEFAULT_RISK_FREE_RATE);
        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        //zero variance makes the sharpe ratio undefined
        assert!(report.sharpe_ratio.is_nan());
    }

    #[test]
    fn empty_series() {
        let report = PerformanceReport::analyze(&[], DEFAULT_RISK_FREE_RATE);
        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.annualized_return, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert!(report.sharpe_ratio.is_nan());
    }

    #[test]
    fn total_return_compounds() {
        let report = PerformanceReport::analyze(&[0.1, -0.05], DEFAULT_RISK_FREE_RATE);
        assert!(close(report.total_return, 1.1 * 0.95 - 1.0));
    }

    #[test]
    fn annualized_return_uses_252_day_convention() {
        let returns = [0.01; 252];
        let report = PerformanceReport::analyze(&returns, DEFAULT_RISK_FREE_RATE);
        //one full synthetic year, so annualized equals total
        assert!(close(report.annualized_return, report.total_return));
    }

    #[test]
    fn max_drawdown_tracks_running_peak() {
        //rally to a peak, then a 10% decline from it
        let report = PerformanceReport::analyze(&[0.10, -0.10], DEFAULT_RISK_FREE_RATE);
        assert!(close(report.max_drawdown, -0.10));
    }

    #[test]
    fn positive_excess_returns_give_positive_sharpe() {
        let report = PerformanceReport::analyze(&[0.01, 0.02, 0.015, 0.03], 0.02);
        assert!(report.sharpe_ratio > 0.0);
    }

    #[test]
    fn periodic_returns_drop_the_first_bar() {
        let returns = periodic_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(returns.len(), 2);
        assert!(close(returns[0], 0.1));
        assert!(close(returns[1], -0.1));
    }

    #[test]
    fn periodic_returns_of_short_series_are_empty() {
        assert!(periodic_returns(&[100.0]).is_empty());
        assert!(periodic_returns(&[]).is_empty());
    }

    #[test]
    fn drawdown_series_is_zero_at_new_peaks() {
        let series = drawdown_series(&[0.1, 0.1, -0.5]);
        assert_eq!(series[0], 0.0);
        assert_eq!(series[1], 0.0);
        assert!(close(series[2], -0.5));
    }
}
