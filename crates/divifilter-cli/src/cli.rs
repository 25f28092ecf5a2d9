//! CLI argument definitions for divifilter.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `load` | Load stock records from a JSON file |
//! | `extreme` | Min or max of a numeric column |
//! | `bounds` | Combined min/max across numeric columns |
//! | `values` | Distinct values of a column |
//! | `filter` | Apply filter criteria and print matching stocks |
//! | `status` | Show data source update times |
//!
//! # Examples
//!
//! ```bash
//! divifilter load radar.json --source radar_file
//! divifilter extreme "Div Yield" max
//! divifilter bounds dgr_1y dgr_3y dgr_5y dgr_10y
//! divifilter filter --min-streak-years 10 --yield-range 2:6 --exclude-sector Energy --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use divifilter_core::NumericRange;

/// Dividend stock screener over a local DuckDB store.
#[derive(Debug, Parser)]
#[command(name = "divifilter", author, version, about = "Dividend stock screener")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to `<home>/divifilter.toml`.
    #[arg(long, global = true, env = "DIVIFILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the DuckDB database file.
    #[arg(long, global = true, env = "DIVIFILTER_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Maximum number of idle pooled connections.
    #[arg(long, global = true, env = "DIVIFILTER_POOL_SIZE")]
    pub pool_size: Option<usize>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load stock records from a JSON array file.
    ///
    /// Existing symbols are merged column by column unless --replace is given.
    Load(LoadArgs),

    /// Min or max of a numeric column across dividend payers.
    Extreme(ExtremeArgs),

    /// Combined min/max across one or more numeric columns.
    Bounds(BoundsArgs),

    /// Distinct values of a column.
    Values(ValuesArgs),

    /// Apply filter criteria and print the matching stocks.
    ///
    /// Flags override values read from --criteria.
    Filter(FilterArgs),

    /// Show the last update time of every data source.
    Status,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// JSON file holding an array of stock records.
    pub file: PathBuf,

    /// Replace the whole table instead of merging.
    #[arg(long, default_value_t = false)]
    pub replace: bool,

    /// Data source name stamped with the load time.
    #[arg(long, default_value = "radar_file")]
    pub source: String,
}

#[derive(Debug, Args)]
pub struct ExtremeArgs {
    /// Column name or key (e.g. "Div Yield" or div_yield).
    pub field: String,

    /// min or max.
    pub which: String,
}

#[derive(Debug, Args)]
pub struct BoundsArgs {
    /// Column names or keys.
    #[arg(required = true)]
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ValuesArgs {
    /// Column name or key.
    pub field: String,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Criteria file (TOML).
    #[arg(long)]
    pub criteria: Option<PathBuf>,

    #[arg(long)]
    pub min_streak_years: Option<f64>,

    /// Dividend yield range as MIN:MAX, applied to current and 5Y average yield.
    #[arg(long, value_parser = parse_range)]
    pub yield_range: Option<NumericRange>,

    /// Minimum dividend growth rate, applied to the 1, 3, 5 and 10 year columns.
    #[arg(long)]
    pub min_dgr: Option<f64>,

    #[arg(long)]
    pub min_chowder_number: Option<f64>,

    /// Price range as MIN:MAX.
    #[arg(long, value_parser = parse_range)]
    pub price_range: Option<NumericRange>,

    #[arg(long)]
    pub max_fair_value: Option<f64>,

    #[arg(long)]
    pub min_eps: Option<f64>,

    #[arg(long)]
    pub min_revenue: Option<f64>,

    #[arg(long)]
    pub min_npm: Option<f64>,

    #[arg(long)]
    pub min_cf_per_share: Option<f64>,

    #[arg(long)]
    pub min_roe: Option<f64>,

    /// P/E range as MIN:MAX.
    #[arg(long, value_parser = parse_range)]
    pub pe_range: Option<NumericRange>,

    #[arg(long)]
    pub max_price_per_book_value: Option<f64>,

    #[arg(long)]
    pub max_debt_per_capital: Option<f64>,

    /// Symbol to exclude (repeatable).
    #[arg(long = "exclude-symbol")]
    pub exclude_symbols: Vec<String>,

    /// Sector to exclude (repeatable).
    #[arg(long = "exclude-sector")]
    pub exclude_sectors: Vec<String>,

    /// Industry to exclude (repeatable).
    #[arg(long = "exclude-industry")]
    pub exclude_industries: Vec<String>,
}

/// Parse `MIN:MAX`. Ordering is checked later by criteria validation.
pub fn parse_range(raw: &str) -> Result<NumericRange, String> {
    let (min, max) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{raw}'"))?;
    let min = min
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid range minimum '{min}': {error}"))?;
    let max = max
        .trim()
        .parse::<f64>()
        .map_err(|error| format!("invalid range maximum '{max}': {error}"))?;
    Ok(NumericRange::new(min, max))
}
