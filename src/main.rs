use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hindsight::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hindsight")]
#[command(about = "A Rust-based single-instrument strategy backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //path to a json configuration file (overrides the other flags)
        #[arg(long)]
        config: Option<PathBuf>,

        //path to csv data file
        #[arg(long, default_value = "data.csv")]
        data: PathBuf,

        //symbol to trade (eg aapl, spy)
        #[arg(long, default_value = "AAPL")]
        symbol: String,

        //strategy type (ma, rsi)
        #[arg(long, default_value = "ma")]
        strategy: String,

        //short moving average window (for ma strategy)
        #[arg(long, default_value = "20")]
        short: usize,

        //long moving average window (for ma strategy)
        #[arg(long, default_value = "50")]
        long: usize,

        //rsi lookback period (for rsi strategy)
        #[arg(long, default_value = "14")]
        rsi_lookback: usize,

        //rsi oversold threshold (for rsi strategy)
        #[arg(long, default_value = "30.0")]
        rsi_lower: f64,

        //rsi overbought threshold (for rsi strategy)
        #[arg(long, default_value = "70.0")]
        rsi_upper: f64,

        //sizing policy (fixed, fraction)
        #[arg(long, default_value = "fixed")]
        sizing: String,

        //number of shares per trade (for fixed sizing)
        #[arg(long, default_value = "10")]
        position_size: u32,

        //fraction of capital per entry (for fraction sizing)
        #[arg(long, default_value = "0.5")]
        capital_fraction: f64,

        //initial trading capital
        #[arg(long, default_value = "100000")]
        initial_capital: f64,

        //annualized risk-free rate
        #[arg(long, default_value = "0.02")]
        risk_free_rate: f64,

        //directory for report artifacts
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            symbol,
            strategy,
            short,
            long,
            rsi_lookback,
            rsi_lower,
            rsi_upper,
            sizing,
            position_size,
            capital_fraction,
            initial_capital,
            risk_free_rate,
            results_dir,
        } => {
            let configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => build_configuration(
                    data,
                    symbol,
                    &strategy,
                    short,
                    long,
                    rsi_lookback,
                    rsi_lower,
                    rsi_upper,
                    &sizing,
                    position_size,
                    capital_fraction,
                    initial_capital,
                    risk_free_rate,
                    results_dir,
                )?,
            };

            run_backtest(&configuration)?;
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_configuration(
    data_path: PathBuf,
    symbol: String,
    strategy: &str,
    short: usize,
    long: usize,
    rsi_lookback: usize,
    rsi_lower: f64,
    rsi_upper: f64,
    sizing: &str,
    position_size: u32,
    capital_fraction: f64,
    initial_capital: f64,
    risk_free_rate: f64,
    results_dir: PathBuf,
) -> Result<BacktestConfiguration> {
    let strategy_type = StrategyType::parse(strategy)
        .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", strategy))?;

    let strategy_params = match strategy_type {
        StrategyType::MaCrossover => StrategyParams::Ma(MaParams {
            short_window: short,
            long_window: long,
        }),
        StrategyType::RsiReversion => StrategyParams::Rsi(RsiParams {
            lookback: rsi_lookback,
            oversold: rsi_lower,
            overbought: rsi_upper,
        }),
    };

    let sizing_type =
        SizingType::parse(sizing).ok_or_else(|| anyhow::anyhow!("Unknown sizing: {}", sizing))?;

    let sizing_params = match sizing_type {
        SizingType::Fixed => SizingParams::Fixed { position_size },
        SizingType::CapitalFraction => SizingParams::Fraction {
            fraction: capital_fraction,
        },
    };

    Ok(BacktestConfiguration {
        data_path,
        symbol,
        initial_capital,
        risk_free_rate,
        strategy_params,
        sizing_params,
        results_dir,
    })
}

fn run_backtest(configuration: &BacktestConfiguration) -> Result<()> {
    println!("Hindsight Backtesting Engine");
    println!("============================\n");

    //load data
    log::info!("loading data from {:?}", configuration.data_path);
    let all_bars = load_csv(&configuration.data_path).context(format!(
        "Failed to load data from {:?}",
        configuration.data_path
    ))?;

    //filter by symbol
    let bars = filter_by_symbol(&all_bars, &configuration.symbol);

    if bars.is_empty() {
        anyhow::bail!("No data found for symbol {}", configuration.symbol);
    }

    println!(
        "Loaded {} bars for {}",
        bars.len(),
        configuration.symbol
    );
    println!(
        "Date range: {} to {}\n",
        bars.first().unwrap().timestamp,
        bars.last().unwrap().timestamp
    );

    //create components
    let provider = configuration.build_provider();
    let mut policy = configuration.build_policy();

    println!("Strategy: {}", provider.name());
    println!("Sizing: {}", policy.name());
    println!("Initial capital: ${:.2}", configuration.initial_capital);
    println!(
        "Risk-free rate: {:.2}%\n",
        configuration.risk_free_rate * 100.0
    );

    //run backtest
    println!("Running backtest...\n");
    let engine = Backtester::new(
        configuration.symbol.clone(),
        &bars,
        configuration.engine_config(),
    );
    let result = engine.run(provider.as_ref(), policy.as_mut())?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    result.report.pretty_print_table();
    println!(
        "\nFinal portfolio value: ${:.2} ({} transactions)",
        result.ledger.value_at(bars.last().unwrap().close),
        result.transactions.len()
    );

    //persist artifacts
    let sink = ReportSink::new(&configuration.results_dir);
    let paths = sink.write_all(
        &configuration.symbol,
        provider.name(),
        policy.name(),
        &result,
    )?;

    println!("\nPerformance report saved to {:?}", paths.performance_txt);
    println!("Transactions saved to {:?}", paths.transactions_csv);
    println!("Portfolio value curve saved to {:?}", paths.portfolio_value_csv);
    println!("Drawdown curve saved to {:?}", paths.drawdown_csv);

    Ok(())
}
