mod bounds;
mod extreme;
mod filter;
mod load;
mod status;
mod values;

use divifilter_core::Screener;
use divifilter_warehouse::WarehouseConfig;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli, config: WarehouseConfig) -> Result<Value, CliError> {
    let screener = Screener::open(config)?;

    let result = match &cli.command {
        Command::Load(args) => load::run(args, &screener),
        Command::Extreme(args) => extreme::run(args, &screener),
        Command::Bounds(args) => bounds::run(args, &screener),
        Command::Values(args) => values::run(args, &screener),
        Command::Filter(args) => filter::run(args, &screener),
        Command::Status => status::run(&screener),
    };

    screener.close();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv.iter().copied()).expect("parse")
    }

    #[test]
    fn load_then_status_and_filter_share_the_store_file() {
        let temp = tempdir().expect("tempdir");
        let config = WarehouseConfig::with_home(temp.path());
        let export = temp.path().join("radar.json");
        fs::write(
            &export,
            r#"[{"Symbol": "KO", "No Years": 62, "Div Yield": 3.1},
                {"Symbol": "T", "No Years": 0, "Div Yield": 6.5}]"#,
        )
        .expect("write export");
        let export = export.display().to_string();

        let loaded = run(
            &parse(&["divifilter", "load", export.as_str(), "--source", "radar_file"]),
            config.clone(),
        )
        .expect("load");
        assert_eq!(loaded["rows_loaded"], 2);

        let status = run(&parse(&["divifilter", "status"]), config.clone()).expect("status");
        assert_eq!(status["symbols"], 2);
        assert_eq!(status["update_times"]["radar_file"], loaded["updated_at"]);
        assert_eq!(
            status["db_path"],
            config.db_path.display().to_string().as_str()
        );

        let filtered = run(
            &parse(&["divifilter", "filter", "--min-streak-years", "10"]),
            config,
        )
        .expect("filter");
        assert_eq!(filtered["count"], 1);
        assert!(filtered["stocks"].get("KO").is_some());
    }
}
