//! Row types stored in the warehouse.

use serde::{Deserialize, Serialize};

use crate::query::SqlParam;
use crate::schema::StockField;

/// One row of `dividend_data_table`.
///
/// Serialized names are the table's column names, so a row fetched in
/// mapping shape deserializes straight into this struct. The snake_case
/// keys are accepted as aliases on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "Symbol", alias = "symbol")]
    pub symbol: String,
    #[serde(rename = "Company", alias = "company", default)]
    pub company: Option<String>,
    #[serde(rename = "Sector", alias = "sector", default)]
    pub sector: Option<String>,
    #[serde(rename = "No Years", alias = "no_years", default)]
    pub no_years: Option<f64>,
    #[serde(rename = "Price", alias = "price", default)]
    pub price: Option<f64>,
    #[serde(rename = "Div Yield", alias = "div_yield", default)]
    pub div_yield: Option<f64>,
    #[serde(rename = "5Y Avg Yield", alias = "avg_yield_5y", default)]
    pub avg_yield_5y: Option<f64>,
    #[serde(rename = "Current Div", alias = "current_div", default)]
    pub current_div: Option<f64>,
    #[serde(rename = "Payouts/ Year", alias = "payouts_per_year", default)]
    pub payouts_per_year: Option<f64>,
    #[serde(rename = "Annualized", alias = "annualized", default)]
    pub annualized: Option<f64>,
    #[serde(rename = "Low", alias = "low", default)]
    pub low: Option<f64>,
    #[serde(rename = "High", alias = "high", default)]
    pub high: Option<f64>,
    #[serde(rename = "DGR 1Y", alias = "dgr_1y", default)]
    pub dgr_1y: Option<f64>,
    #[serde(rename = "DGR 3Y", alias = "dgr_3y", default)]
    pub dgr_3y: Option<f64>,
    #[serde(rename = "DGR 5Y", alias = "dgr_5y", default)]
    pub dgr_5y: Option<f64>,
    #[serde(rename = "DGR 10Y", alias = "dgr_10y", default)]
    pub dgr_10y: Option<f64>,
    #[serde(rename = "TTR 1Y", alias = "ttr_1y", default)]
    pub ttr_1y: Option<f64>,
    #[serde(rename = "TTR 3Y", alias = "ttr_3y", default)]
    pub ttr_3y: Option<f64>,
    #[serde(rename = "Fair Value", alias = "fair_value", default)]
    pub fair_value: Option<f64>,
    #[serde(rename = "FV %", alias = "fv_percent", default)]
    pub fv_percent: Option<f64>,
    #[serde(rename = "Chowder Number", alias = "chowder_number", default)]
    pub chowder_number: Option<f64>,
    #[serde(rename = "EPS 1Y", alias = "eps_1y", default)]
    pub eps_1y: Option<f64>,
    #[serde(rename = "Revenue 1Y", alias = "revenue_1y", default)]
    pub revenue_1y: Option<f64>,
    #[serde(rename = "NPM", alias = "npm", default)]
    pub npm: Option<f64>,
    #[serde(rename = "CF/Share", alias = "cf_per_share", default)]
    pub cf_per_share: Option<f64>,
    #[serde(rename = "ROE", alias = "roe", default)]
    pub roe: Option<f64>,
    #[serde(rename = "Debt/Capital", alias = "debt_per_capital", default)]
    pub debt_per_capital: Option<f64>,
    #[serde(rename = "ROTC", alias = "rotc", default)]
    pub rotc: Option<f64>,
    #[serde(rename = "P/E", alias = "pe", default)]
    pub pe: Option<f64>,
    #[serde(rename = "P/BV", alias = "pbv", default)]
    pub pbv: Option<f64>,
    #[serde(rename = "PEG", alias = "peg", default)]
    pub peg: Option<f64>,
    #[serde(rename = "Industry", alias = "industry", default)]
    pub industry: Option<String>,
}

impl StockRecord {
    /// A record with only the symbol set.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for a numeric column. Categorical fields are ignored.
    #[must_use]
    pub fn with(mut self, field: StockField, value: f64) -> Self {
        if let Some(slot) = self.numeric_mut(field) {
            *slot = Some(value);
        }
        self
    }

    /// Builder-style setter for a categorical column other than `Symbol`.
    #[must_use]
    pub fn with_text(mut self, field: StockField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            StockField::Company => self.company = value,
            StockField::Sector => self.sector = value,
            StockField::Industry => self.industry = value,
            _ => {}
        }
        self
    }

    /// Value of a numeric column; `None` for null and for categorical fields.
    #[must_use]
    pub fn numeric(&self, field: StockField) -> Option<f64> {
        match field {
            StockField::NoYears => self.no_years,
            StockField::Price => self.price,
            StockField::DivYield => self.div_yield,
            StockField::AvgYield5y => self.avg_yield_5y,
            StockField::CurrentDiv => self.current_div,
            StockField::PayoutsPerYear => self.payouts_per_year,
            StockField::Annualized => self.annualized,
            StockField::Low => self.low,
            StockField::High => self.high,
            StockField::Dgr1y => self.dgr_1y,
            StockField::Dgr3y => self.dgr_3y,
            StockField::Dgr5y => self.dgr_5y,
            StockField::Dgr10y => self.dgr_10y,
            StockField::Ttr1y => self.ttr_1y,
            StockField::Ttr3y => self.ttr_3y,
            StockField::FairValue => self.fair_value,
            StockField::FvPercent => self.fv_percent,
            StockField::ChowderNumber => self.chowder_number,
            StockField::Eps1y => self.eps_1y,
            StockField::Revenue1y => self.revenue_1y,
            StockField::Npm => self.npm,
            StockField::CfPerShare => self.cf_per_share,
            StockField::Roe => self.roe,
            StockField::DebtPerCapital => self.debt_per_capital,
            StockField::Rotc => self.rotc,
            StockField::Pe => self.pe,
            StockField::Pbv => self.pbv,
            StockField::Peg => self.peg,
            StockField::Symbol | StockField::Company | StockField::Sector | StockField::Industry => {
                None
            }
        }
    }

    /// Value of a categorical column; `None` for null and for numeric fields.
    #[must_use]
    pub fn text(&self, field: StockField) -> Option<&str> {
        match field {
            StockField::Symbol => Some(self.symbol.as_str()),
            StockField::Company => self.company.as_deref(),
            StockField::Sector => self.sector.as_deref(),
            StockField::Industry => self.industry.as_deref(),
            _ => None,
        }
    }

    /// The column value as a bound parameter.
    #[must_use]
    pub fn param(&self, field: StockField) -> SqlParam {
        if field.is_numeric() {
            self.numeric(field).map_or(SqlParam::Null, SqlParam::Double)
        } else {
            self.text(field)
                .map_or(SqlParam::Null, |value| SqlParam::Text(value.to_string()))
        }
    }

    fn numeric_mut(&mut self, field: StockField) -> Option<&mut Option<f64>> {
        let slot = match field {
            StockField::NoYears => &mut self.no_years,
            StockField::Price => &mut self.price,
            StockField::DivYield => &mut self.div_yield,
            StockField::AvgYield5y => &mut self.avg_yield_5y,
            StockField::CurrentDiv => &mut self.current_div,
            StockField::PayoutsPerYear => &mut self.payouts_per_year,
            StockField::Annualized => &mut self.annualized,
            StockField::Low => &mut self.low,
            StockField::High => &mut self.high,
            StockField::Dgr1y => &mut self.dgr_1y,
            StockField::Dgr3y => &mut self.dgr_3y,
            StockField::Dgr5y => &mut self.dgr_5y,
            StockField::Dgr10y => &mut self.dgr_10y,
            StockField::Ttr1y => &mut self.ttr_1y,
            StockField::Ttr3y => &mut self.ttr_3y,
            StockField::FairValue => &mut self.fair_value,
            StockField::FvPercent => &mut self.fv_percent,
            StockField::ChowderNumber => &mut self.chowder_number,
            StockField::Eps1y => &mut self.eps_1y,
            StockField::Revenue1y => &mut self.revenue_1y,
            StockField::Npm => &mut self.npm,
            StockField::CfPerShare => &mut self.cf_per_share,
            StockField::Roe => &mut self.roe,
            StockField::DebtPerCapital => &mut self.debt_per_capital,
            StockField::Rotc => &mut self.rotc,
            StockField::Pe => &mut self.pe,
            StockField::Pbv => &mut self.pbv,
            StockField::Peg => &mut self.peg,
            StockField::Symbol | StockField::Company | StockField::Sector | StockField::Industry => {
                return None
            }
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_accessor_covers_every_numeric_column() {
        for (index, field) in StockField::ALL.into_iter().enumerate() {
            let record = StockRecord::new("AAPL").with(field, index as f64);
            if field.is_numeric() {
                assert_eq!(record.numeric(field), Some(index as f64), "{field}");
            } else {
                assert_eq!(record.numeric(field), None, "{field}");
            }
        }
    }

    #[test]
    fn deserializes_from_column_names_and_keys() {
        let by_column: StockRecord = serde_json::from_str(
            r#"{"Symbol": "KO", "Div Yield": 3.1, "P/E": null, "Sector": "Consumer Staples"}"#,
        )
        .expect("column names");
        let by_key: StockRecord =
            serde_json::from_str(r#"{"symbol": "KO", "div_yield": 3.1, "sector": "Consumer Staples"}"#)
                .expect("keys");

        assert_eq!(by_column, by_key);
        assert_eq!(by_column.div_yield, Some(3.1));
        assert_eq!(by_column.pe, None);
    }

    #[test]
    fn param_reflects_nulls() {
        let record = StockRecord::new("T").with(StockField::Price, 17.5);
        assert_eq!(record.param(StockField::Price), SqlParam::Double(17.5));
        assert_eq!(record.param(StockField::Pe), SqlParam::Null);
        assert_eq!(record.param(StockField::Symbol), SqlParam::Text(String::from("T")));
        assert_eq!(record.param(StockField::Sector), SqlParam::Null);
    }
}
