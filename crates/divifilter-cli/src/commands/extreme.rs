use divifilter_core::Screener;
use serde::Serialize;
use serde_json::Value;

use crate::cli::ExtremeArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ExtremeResponseData<'a> {
    field: &'a str,
    which: &'a str,
    value: Option<f64>,
}

pub fn run(args: &ExtremeArgs, screener: &Screener) -> Result<Value, CliError> {
    let value = screener.metadata().extreme(&args.field, &args.which)?;

    Ok(serde_json::to_value(ExtremeResponseData {
        field: &args.field,
        which: &args.which,
        value,
    })?)
}
