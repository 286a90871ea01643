use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use stock_forecast::{PriceColumn, YahooFinanceClient};
use stockcast::report::{terminal_summary, write_html};
use stockcast::{Dashboard, DashboardParams, HistorySource, TICKERS};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Forecast the stock market price of a selected company")]
struct Args {
    /// Company ticker symbol
    #[arg(long)]
    ticker: Option<String>,

    /// First day of the history (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Day after the history; forecasts start here (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Column to forecast: Open, High, Low, Close, "Adj Close" or Volume
    #[arg(long)]
    column: Option<PriceColumn>,

    /// Autoregressive order, 0 to 5
    #[arg(short)]
    p: Option<usize>,

    /// Differencing order, 0 to 5
    #[arg(short)]
    d: Option<usize>,

    /// Moving-average order, 0 to 5
    #[arg(short)]
    q: Option<usize>,

    /// Seasonal period, 0 to 24
    #[arg(long)]
    seasonal_period: Option<usize>,

    /// Number of days to forecast
    #[arg(long)]
    forecast_period: Option<usize>,

    /// YAML file with dashboard parameters; flags override it
    #[arg(long)]
    params: Option<PathBuf>,

    /// Read the history from a CSV file instead of Yahoo Finance
    #[arg(long, conflicts_with = "synthetic")]
    csv: Option<PathBuf>,

    /// Generate a synthetic history from this seed instead of fetching
    #[arg(long)]
    synthetic: Option<u64>,

    /// Where to write the HTML report
    #[arg(short, long, default_value = "stockcast_report.html")]
    output: PathBuf,

    /// Also write the predictions to this CSV file
    #[arg(long)]
    predictions_csv: Option<PathBuf>,

    /// Print the available tickers and exit
    #[arg(long)]
    list_tickers: bool,
}

impl Args {
    fn apply(&self, params: &mut DashboardParams) {
        if let Some(ticker) = &self.ticker {
            params.ticker = ticker.clone();
        }
        if let Some(start) = self.start {
            params.start_date = start;
        }
        if let Some(end) = self.end {
            params.end_date = end;
        }
        if let Some(column) = self.column {
            params.column = column;
        }
        if let Some(p) = self.p {
            params.p = p;
        }
        if let Some(d) = self.d {
            params.d = d;
        }
        if let Some(q) = self.q {
            params.q = q;
        }
        if let Some(s) = self.seasonal_period {
            params.seasonal_period = s;
        }
        if let Some(n) = self.forecast_period {
            params.forecast_period = n;
        }
    }

    fn source(&self) -> Result<HistorySource> {
        Ok(match (&self.csv, self.synthetic) {
            (Some(path), _) => HistorySource::Csv(path.clone()),
            (None, Some(seed)) => HistorySource::Synthetic(seed),
            (None, None) => HistorySource::Yahoo(
                YahooFinanceClient::from_env().context("failed to build HTTP client")?,
            ),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if args.list_tickers {
        for ticker in TICKERS {
            println!("{}", ticker);
        }
        return Ok(());
    }

    let mut params = match &args.params {
        Some(path) => DashboardParams::load(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => DashboardParams::default(),
    };
    args.apply(&mut params);
    info!(?params, "starting run");

    let dashboard = Dashboard::new(params).context("invalid parameters")?;
    let report = dashboard
        .load_and_run(&args.source()?)
        .await
        .context("forecast run failed")?;

    println!("{}", terminal_summary(&report));

    write_html(&report, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    if let Some(path) = &args.predictions_csv {
        report
            .forecast
            .to_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote predictions");
    }

    Ok(())
}
