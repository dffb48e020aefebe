//! CLI argument definitions for coinseries.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `series` | Records of one coin matching optional date/price/volume bounds |
//! | `stats` | Average price and total volume between two dates |
//! | `page` | One page of a coin's records in ascending time order |
//! | `coins` | Every coin id in the store |
//! | `health` | Check that the store answers |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--db` | `$COINSERIES_HOME/timeseries.duckdb` | Database file |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--max-rows` | unbounded | Reject results larger than this |
//! | `--query-timeout-ms` | `5000` | Query time budget in ms |
//!
//! # Examples
//!
//! ```bash
//! coinseries series bitcoin --start-date 2024-01-01 --end-date 2024-01-31 --min-price 40000
//! coinseries stats bitcoin --start-date 2024-01-01 --end-date 2024-01-04 --pretty
//! coinseries page ethereum --limit 50 --offset 100
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use time::macros::format_description;
use time::Date;

/// Query stored crypto price/volume history.
#[derive(Debug, Parser)]
#[command(
    name = "coinseries",
    author,
    version,
    about = "Query stored crypto price/volume history",
    long_about = "coinseries reads historical price and volume records for crypto assets \
from a local DuckDB store. Every command prints one JSON envelope on stdout; failures \
print a JSON error on stderr and exit non-zero.\n\
\n\
Exit codes: 2 invalid argument, 3 not found, 4 output serialization, 10 store failure."
)]
pub struct Cli {
    /// Path to the DuckDB database file.
    ///
    /// Defaults to COINSERIES_DB_PATH, then $COINSERIES_HOME/timeseries.duckdb.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Reject queries returning more rows than this.
    #[arg(long, global = true)]
    pub max_rows: Option<usize>,

    /// Query timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 5_000)]
    pub query_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch records matching optional bounds.
    ///
    /// Every bound is inclusive; `--end-date` covers the whole day.
    /// An empty match is a successful, empty result.
    ///
    /// # Examples
    ///
    ///   coinseries series bitcoin
    ///   coinseries series bitcoin --start-date 2024-01-01 --max-volume 5000
    Series(SeriesArgs),

    /// Average price and total volume between two dates.
    ///
    /// Both dates are required. Exits with code 3 when nothing matches.
    Stats(StatsArgs),

    /// One page of records ordered by ascending timestamp.
    ///
    /// Exits with code 3 when the page is empty.
    Page(PageArgs),

    /// List every coin id in the store.
    Coins,

    /// Check that the store answers a trivial query.
    Health,
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Series(_) => "series",
            Self::Stats(_) => "stats",
            Self::Page(_) => "page",
            Self::Coins => "coins",
            Self::Health => "health",
        }
    }
}

/// Arguments for the `series` command.
#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Coin identifier (e.g., bitcoin).
    pub coin: String,

    /// First day to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<Date>,

    /// Last day to include, through 23:59:59 (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<Date>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_volume: Option<f64>,

    #[arg(long)]
    pub max_volume: Option<f64>,
}

/// Arguments for the `stats` command.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Coin identifier.
    pub coin: String,

    /// Start of the range, compared against midnight (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<Date>,

    /// End of the range, compared against midnight (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<Date>,
}

/// Arguments for the `page` command.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Coin identifier.
    pub coin: String,

    /// Maximum number of records to return.
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    /// Number of records to skip.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}
