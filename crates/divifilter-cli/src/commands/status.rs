use std::collections::BTreeMap;

use divifilter_core::Screener;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatusResponseData {
    db_path: Option<String>,
    symbols: usize,
    update_times: BTreeMap<String, String>,
}

pub fn run(screener: &Screener) -> Result<Value, CliError> {
    let metadata = screener.metadata();

    Ok(serde_json::to_value(StatusResponseData {
        db_path: screener
            .warehouse()
            .db_path()
            .map(|path| path.display().to_string()),
        symbols: metadata.symbols()?.len(),
        update_times: metadata.update_times()?,
    })?)
}
