//! Column catalog for `dividend_data_table`.
//!
//! The catalog is the only source of identifiers that ever reach SQL text.
//! Values always travel as bound parameters.

use std::fmt::{Display, Formatter};

/// Name of the stock table.
pub const STOCK_TABLE: &str = "dividend_data_table";

/// Name of the update-time bookkeeping table.
pub const UPDATE_TIMES_TABLE: &str = "dividend_update_times";

/// Whether a column holds text or a nullable double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Categorical,
    Numeric,
}

/// A column of the stock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockField {
    Symbol,
    Company,
    Sector,
    NoYears,
    Price,
    DivYield,
    AvgYield5y,
    CurrentDiv,
    PayoutsPerYear,
    Annualized,
    Low,
    High,
    Dgr1y,
    Dgr3y,
    Dgr5y,
    Dgr10y,
    Ttr1y,
    Ttr3y,
    FairValue,
    FvPercent,
    ChowderNumber,
    Eps1y,
    Revenue1y,
    Npm,
    CfPerShare,
    Roe,
    DebtPerCapital,
    Rotc,
    Pe,
    Pbv,
    Peg,
    Industry,
}

impl StockField {
    /// Every column, in table order.
    pub const ALL: [StockField; 32] = [
        Self::Symbol,
        Self::Company,
        Self::Sector,
        Self::NoYears,
        Self::Price,
        Self::DivYield,
        Self::AvgYield5y,
        Self::CurrentDiv,
        Self::PayoutsPerYear,
        Self::Annualized,
        Self::Low,
        Self::High,
        Self::Dgr1y,
        Self::Dgr3y,
        Self::Dgr5y,
        Self::Dgr10y,
        Self::Ttr1y,
        Self::Ttr3y,
        Self::FairValue,
        Self::FvPercent,
        Self::ChowderNumber,
        Self::Eps1y,
        Self::Revenue1y,
        Self::Npm,
        Self::CfPerShare,
        Self::Roe,
        Self::DebtPerCapital,
        Self::Rotc,
        Self::Pe,
        Self::Pbv,
        Self::Peg,
        Self::Industry,
    ];

    /// The field whose presence marks a row as a dividend payer.
    pub const PRESENCE: StockField = Self::DivYield;

    /// Column name as stored in the table and shown to users.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Company => "Company",
            Self::Sector => "Sector",
            Self::NoYears => "No Years",
            Self::Price => "Price",
            Self::DivYield => "Div Yield",
            Self::AvgYield5y => "5Y Avg Yield",
            Self::CurrentDiv => "Current Div",
            Self::PayoutsPerYear => "Payouts/ Year",
            Self::Annualized => "Annualized",
            Self::Low => "Low",
            Self::High => "High",
            Self::Dgr1y => "DGR 1Y",
            Self::Dgr3y => "DGR 3Y",
            Self::Dgr5y => "DGR 5Y",
            Self::Dgr10y => "DGR 10Y",
            Self::Ttr1y => "TTR 1Y",
            Self::Ttr3y => "TTR 3Y",
            Self::FairValue => "Fair Value",
            Self::FvPercent => "FV %",
            Self::ChowderNumber => "Chowder Number",
            Self::Eps1y => "EPS 1Y",
            Self::Revenue1y => "Revenue 1Y",
            Self::Npm => "NPM",
            Self::CfPerShare => "CF/Share",
            Self::Roe => "ROE",
            Self::DebtPerCapital => "Debt/Capital",
            Self::Rotc => "ROTC",
            Self::Pe => "P/E",
            Self::Pbv => "P/BV",
            Self::Peg => "PEG",
            Self::Industry => "Industry",
        }
    }

    /// snake_case key accepted on the command line and in criteria files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Company => "company",
            Self::Sector => "sector",
            Self::NoYears => "no_years",
            Self::Price => "price",
            Self::DivYield => "div_yield",
            Self::AvgYield5y => "avg_yield_5y",
            Self::CurrentDiv => "current_div",
            Self::PayoutsPerYear => "payouts_per_year",
            Self::Annualized => "annualized",
            Self::Low => "low",
            Self::High => "high",
            Self::Dgr1y => "dgr_1y",
            Self::Dgr3y => "dgr_3y",
            Self::Dgr5y => "dgr_5y",
            Self::Dgr10y => "dgr_10y",
            Self::Ttr1y => "ttr_1y",
            Self::Ttr3y => "ttr_3y",
            Self::FairValue => "fair_value",
            Self::FvPercent => "fv_percent",
            Self::ChowderNumber => "chowder_number",
            Self::Eps1y => "eps_1y",
            Self::Revenue1y => "revenue_1y",
            Self::Npm => "npm",
            Self::CfPerShare => "cf_per_share",
            Self::Roe => "roe",
            Self::DebtPerCapital => "debt_per_capital",
            Self::Rotc => "rotc",
            Self::Pe => "pe",
            Self::Pbv => "pbv",
            Self::Peg => "peg",
            Self::Industry => "industry",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Symbol | Self::Company | Self::Sector | Self::Industry => FieldKind::Categorical,
            _ => FieldKind::Numeric,
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self.kind(), FieldKind::Numeric)
    }

    /// Double-quoted identifier, safe to splice into SQL.
    #[must_use]
    pub fn quoted(self) -> String {
        format!("\"{}\"", self.sql_name().replace('"', "\"\""))
    }

    /// Resolve either the column name (`"Div Yield"`) or the key
    /// (`"div_yield"`). Matching is exact after trimming.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.sql_name() == name || field.key() == name)
    }

    /// Comma-separated, quoted list of every column in table order.
    #[must_use]
    pub fn select_list() -> String {
        Self::ALL
            .iter()
            .map(|field| field.quoted())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for StockField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sql_name())
    }
}
