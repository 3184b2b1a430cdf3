use crate::engine::{BacktestResult, Transaction};
use crate::metrics::drawdown_series;
use anyhow::{Context, Result};
use chrono::Utc;
use prettytable::{Cell, Row, Table};
use std::io::Write;
use std::path::{Path, PathBuf};

//paths of the artifacts written for one run
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub performance_txt: PathBuf,
    pub transactions_csv: PathBuf,
    pub portfolio_value_csv: PathBuf,
    pub drawdown_csv: PathBuf,
}

//writes the engine's outputs to a results directory
//the directory is an explicit parameter, there is no process-wide default
pub struct ReportSink {
    results_dir: PathBuf,
}

impl ReportSink {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        ReportSink {
            results_dir: results_dir.into(),
        }
    }

    //derives the deterministic artifact name prefix for a run
    fn base_filename(&self, symbol: &str, strategy_name: &str, sizer_name: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            symbol,
            strategy_name,
            sizer_name,
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }

    //persists all artifacts for a completed run
    pub fn write_all(
        &self,
        symbol: &str,
        strategy_name: &str,
        sizer_name: &str,
        result: &BacktestResult,
    ) -> Result<ReportPaths> {
        std::fs::create_dir_all(&self.results_dir).context(format!(
            "Failed to create results directory {:?}",
            self.results_dir
        ))?;

        let base = self.base_filename(symbol, strategy_name, sizer_name);

        let paths = ReportPaths {
            performance_txt: self.results_dir.join(format!("{}_performance.txt", base)),
            transactions_csv: self.results_dir.join(format!("{}_transactions.csv", base)),
            portfolio_value_csv: self
                .results_dir
                .join(format!("{}_portfolio_value.csv", base)),
            drawdown_csv: self.results_dir.join(format!("{}_drawdown.csv", base)),
        };

        self.write_performance_txt(&paths.performance_txt, result)?;
        self.write_transactions_csv(&paths.transactions_csv, &result.transactions)?;
        self.write_portfolio_value_csv(&paths.portfolio_value_csv, result)?;
        self.write_drawdown_csv(&paths.drawdown_csv, result)?;

        log::info!("backtest artifacts written to {:?}", self.results_dir);

        Ok(paths)
    }

    fn write_performance_txt(&self, path: &Path, result: &BacktestResult) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .context(format!("Failed to create performance report {:?}", path))?;

        writeln!(file, "Performance Metrics:")?;
        for (name, value) in result.report.formatted_lines() {
            writeln!(file, "  {}: {}", name, value)?;
        }

        writeln!(file)?;
        writeln!(file, "Transactions:")?;
        write!(file, "{}", transactions_table(&result.transactions))?;

        Ok(())
    }

    fn write_transactions_csv(&self, path: &Path, transactions: &[Transaction]) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .context(format!("Failed to create transactions CSV {:?}", path))?;

        for transaction in transactions {
            writer.serialize(transaction)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn write_portfolio_value_csv(&self, path: &Path, result: &BacktestResult) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .context(format!("Failed to create portfolio value CSV {:?}", path))?;

        writeln!(file, "timestamp,value")?;
        for point in &result.portfolio_values {
            writeln!(file, "{},{}", point.timestamp.to_rfc3339(), point.value)?;
        }

        Ok(())
    }

    fn write_drawdown_csv(&self, path: &Path, result: &BacktestResult) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .context(format!("Failed to create drawdown CSV {:?}", path))?;

        let drawdowns = drawdown_series(&result.returns);

        writeln!(file, "timestamp,drawdown")?;
        //the return series starts at the second bar, so drawdowns align
        //with the portfolio value series shifted by one
        for (point, drawdown) in result.portfolio_values.iter().skip(1).zip(&drawdowns) {
            writeln!(file, "{},{}", point.timestamp.to_rfc3339(), drawdown)?;
        }

        Ok(())
    }
}

//tabular rendering of the transaction log
fn transactions_table(transactions: &[Transaction]) -> Table {
    let mut table = Table::new();

    table.add_row(Row::new(vec![
        Cell::new("timestamp"),
        Cell::new("symbol"),
        Cell::new("action"),
        Cell::new("quantity"),
        Cell::new("price"),
        Cell::new("value"),
    ]));

    for tx in transactions {
        table.add_row(Row::new(vec![
            Cell::new(&tx.timestamp.to_rfc3339()),
            Cell::new(&tx.symbol),
            Cell::new(&tx.action.to_string()),
            Cell::new(&tx.quantity.to_string()),
            Cell::new(&format!("{:.2}", tx.price)),
            Cell::new(&format!("{:.2}", tx.value)),
        ]));
    }

    table
}
