use std::fs;

use divifilter_core::Screener;
use divifilter_warehouse::StockRecord;
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::cli::LoadArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct LoadResponseData {
    source: String,
    mode: &'static str,
    rows_loaded: usize,
    updated_at: String,
}

pub fn run(args: &LoadArgs, screener: &Screener) -> Result<Value, CliError> {
    let raw = fs::read_to_string(&args.file)?;
    let records: Vec<StockRecord> = serde_json::from_str(&raw)?;

    if let Some(record) = records.iter().find(|record| record.symbol.trim().is_empty()) {
        return Err(CliError::Command(format!(
            "record with empty symbol in '{}': {record:?}",
            args.file.display()
        )));
    }

    let warehouse = screener.warehouse();
    let (mode, rows_loaded) = if args.replace {
        ("replace", warehouse.replace_stocks(&records)?)
    } else {
        ("merge", warehouse.upsert_stocks(&records)?)
    };

    let updated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|error| CliError::Command(format!("cannot format load time: {error}")))?;
    warehouse.record_update_time(&args.source, &updated_at)?;

    tracing::info!(source = %args.source, mode, rows = rows_loaded, "loaded stock records");

    Ok(serde_json::to_value(LoadResponseData {
        source: args.source.clone(),
        mode,
        rows_loaded,
        updated_at,
    })?)
}
