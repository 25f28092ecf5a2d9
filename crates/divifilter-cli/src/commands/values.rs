use std::collections::BTreeSet;

use divifilter_core::Screener;
use serde::Serialize;
use serde_json::Value;

use crate::cli::ValuesArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ValuesResponseData<'a> {
    field: &'a str,
    values: BTreeSet<String>,
}

pub fn run(args: &ValuesArgs, screener: &Screener) -> Result<Value, CliError> {
    let values = screener.metadata().distinct_values(&args.field)?;

    Ok(serde_json::to_value(ValuesResponseData {
        field: &args.field,
        values,
    })?)
}
