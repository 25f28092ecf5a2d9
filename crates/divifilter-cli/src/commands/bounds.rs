use divifilter_core::{NumericRange, Screener};
use serde::Serialize;
use serde_json::Value;

use crate::cli::BoundsArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct BoundsResponseData<'a> {
    fields: &'a [String],
    bounds: Option<NumericRange>,
}

pub fn run(args: &BoundsArgs, screener: &Screener) -> Result<Value, CliError> {
    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
    let bounds = screener.metadata().bounds(&fields)?;

    Ok(serde_json::to_value(BoundsResponseData {
        fields: &args.fields,
        bounds,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use divifilter_warehouse::{StockField, StockRecord};

    #[test]
    fn response_lists_fields_and_combined_range() {
        let screener = Screener::open_in_memory().expect("screener");
        screener
            .warehouse()
            .upsert_stocks(&[
                StockRecord::new("T")
                    .with(StockField::DivYield, 6.5)
                    .with(StockField::AvgYield5y, 7.2),
                StockRecord::new("KO")
                    .with(StockField::DivYield, 3.1)
                    .with(StockField::AvgYield5y, 3.0),
            ])
            .expect("seed");
        let args = BoundsArgs {
            fields: vec![String::from("Div Yield"), String::from("avg_yield_5y")],
        };

        let response = run(&args, &screener).expect("bounds");

        assert_eq!(
            response,
            serde_json::json!({
                "fields": ["Div Yield", "avg_yield_5y"],
                "bounds": {"min": 3.0, "max": 7.2},
            })
        );
    }

    #[test]
    fn empty_store_gives_null_bounds() {
        let screener = Screener::open_in_memory().expect("screener");
        let args = BoundsArgs {
            fields: vec![String::from("DGR 10Y")],
        };

        let response = run(&args, &screener).expect("bounds");

        assert!(response["bounds"].is_null());
    }
}
