use std::fs;

use divifilter_core::{FilterCriteria, ResultSet, Screener};
use serde::Serialize;
use serde_json::Value;

use crate::cli::FilterArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct FilterResponseData {
    criteria: FilterCriteria,
    count: usize,
    stocks: ResultSet,
}

pub fn run(args: &FilterArgs, screener: &Screener) -> Result<Value, CliError> {
    let criteria = criteria_from(args)?;
    let stocks = screener.engine().apply(&criteria)?;

    Ok(serde_json::to_value(FilterResponseData {
        count: stocks.len(),
        criteria,
        stocks,
    })?)
}

/// Criteria file contents with command-line flags layered on top.
fn criteria_from(args: &FilterArgs) -> Result<FilterCriteria, CliError> {
    let mut criteria = match &args.criteria {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            toml::from_str(&raw).map_err(|error| {
                CliError::Command(format!("invalid criteria '{}': {error}", path.display()))
            })?
        }
        None => FilterCriteria::default(),
    };

    let thresholds = [
        (&mut criteria.min_streak_years, args.min_streak_years),
        (&mut criteria.min_dgr, args.min_dgr),
        (&mut criteria.min_chowder_number, args.min_chowder_number),
        (&mut criteria.max_fair_value, args.max_fair_value),
        (&mut criteria.min_eps, args.min_eps),
        (&mut criteria.min_revenue, args.min_revenue),
        (&mut criteria.min_npm, args.min_npm),
        (&mut criteria.min_cf_per_share, args.min_cf_per_share),
        (&mut criteria.min_roe, args.min_roe),
        (&mut criteria.max_price_per_book_value, args.max_price_per_book_value),
        (&mut criteria.max_debt_per_capital, args.max_debt_per_capital),
    ];
    for (slot, flag) in thresholds {
        if flag.is_some() {
            *slot = flag;
        }
    }

    let ranges = [
        (&mut criteria.yield_range, args.yield_range),
        (&mut criteria.price_range, args.price_range),
        (&mut criteria.pe_range, args.pe_range),
    ];
    for (slot, flag) in ranges {
        if flag.is_some() {
            *slot = flag;
        }
    }

    let exclusions = [
        (&mut criteria.excluded_symbols, &args.exclude_symbols),
        (&mut criteria.excluded_sectors, &args.exclude_sectors),
        (&mut criteria.excluded_industries, &args.exclude_industries),
    ];
    for (slot, flag) in exclusions {
        if !flag.is_empty() {
            slot.clone_from(flag);
        }
    }

    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use divifilter_core::NumericRange;
    use tempfile::tempdir;

    fn filter_args(argv: &[&str]) -> FilterArgs {
        let cli = Cli::try_parse_from(argv.iter().copied()).expect("parse");
        match cli.command {
            Command::Filter(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_criteria_file() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("criteria.toml");
        fs::write(
            &path,
            "min_streak_years = 25\nmin_roe = 10\nexcluded_sectors = [\"Energy\"]\n\n[pe_range]\nmin = 0\nmax = 30\n",
        )
        .expect("write criteria");
        let path = path.display().to_string();

        let args = filter_args(&[
            "divifilter",
            "filter",
            "--criteria",
            path.as_str(),
            "--min-streak-years",
            "10",
            "--exclude-sector",
            "Utilities",
        ]);
        let criteria = criteria_from(&args).expect("criteria");

        assert_eq!(criteria.min_streak_years, Some(10.0));
        assert_eq!(criteria.min_roe, Some(10.0));
        assert_eq!(criteria.pe_range, Some(NumericRange::new(0.0, 30.0)));
        assert_eq!(criteria.excluded_sectors, vec!["Utilities"]);
    }

    #[test]
    fn flags_alone_build_criteria() {
        let args = filter_args(&["divifilter", "filter", "--price-range", "10:200"]);
        let criteria = criteria_from(&args).expect("criteria");
        assert_eq!(
            criteria,
            FilterCriteria {
                price_range: Some(NumericRange::new(10.0, 200.0)),
                ..FilterCriteria::default()
            }
        );
    }

    #[test]
    fn malformed_criteria_file_is_a_command_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("criteria.toml");
        fs::write(&path, "min_dividend = 3\n").expect("write criteria");
        let path = path.display().to_string();

        let args = filter_args(&["divifilter", "filter", "--criteria", path.as_str()]);
        let error = criteria_from(&args).expect_err("unknown key");
        assert_eq!(error.exit_code(), 2);
    }
}
