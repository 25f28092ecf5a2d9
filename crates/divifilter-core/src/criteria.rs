//! Filter criteria and the per-field conditions they expand into.

use divifilter_warehouse::{StockField, StockRecord};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ValidationError> {
        finite(field, self.min)?;
        finite(field, self.max)?;
        if self.min > self.max {
            return Err(ValidationError::InvertedRange {
                field,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
        Ok(())
    }
}

/// The user's filter selection. Absent entries add no condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    pub min_streak_years: Option<f64>,
    pub yield_range: Option<NumericRange>,
    pub min_dgr: Option<f64>,
    pub min_chowder_number: Option<f64>,
    pub price_range: Option<NumericRange>,
    pub max_fair_value: Option<f64>,
    pub min_eps: Option<f64>,
    pub min_revenue: Option<f64>,
    pub min_npm: Option<f64>,
    pub min_cf_per_share: Option<f64>,
    pub min_roe: Option<f64>,
    pub pe_range: Option<NumericRange>,
    pub max_price_per_book_value: Option<f64>,
    pub max_debt_per_capital: Option<f64>,
    pub excluded_symbols: Vec<String>,
    pub excluded_sectors: Vec<String>,
    pub excluded_industries: Vec<String>,
}

/// Requirement placed on one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    AtMost(f64),
    Within(NumericRange),
}

impl Bound {
    /// Null always satisfies a bound.
    #[must_use]
    pub fn admits(&self, value: Option<f64>) -> bool {
        let Some(value) = value else {
            return true;
        };
        match self {
            Self::AtLeast(threshold) => value >= *threshold,
            Self::AtMost(ceiling) => value <= *ceiling,
            Self::Within(range) => range.contains(value),
        }
    }
}

/// One numeric column paired with its bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldCondition {
    pub field: StockField,
    pub bound: Bound,
}

/// A categorical column and the values excluded from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exclusion<'a> {
    pub field: StockField,
    pub values: &'a [String],
}

impl Exclusion<'_> {
    /// Null is never in the list.
    #[must_use]
    pub fn admits(&self, value: Option<&str>) -> bool {
        value.map_or(true, |value| !self.values.iter().any(|excluded| excluded == value))
    }
}

const DGR_FIELDS: [StockField; 4] = [
    StockField::Dgr1y,
    StockField::Dgr3y,
    StockField::Dgr5y,
    StockField::Dgr10y,
];

const YIELD_FIELDS: [StockField; 2] = [StockField::DivYield, StockField::AvgYield5y];

impl FilterCriteria {
    /// Check every bound is finite and every range is ordered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let thresholds = [
            ("min_streak_years", self.min_streak_years),
            ("min_dgr", self.min_dgr),
            ("min_chowder_number", self.min_chowder_number),
            ("max_fair_value", self.max_fair_value),
            ("min_eps", self.min_eps),
            ("min_revenue", self.min_revenue),
            ("min_npm", self.min_npm),
            ("min_cf_per_share", self.min_cf_per_share),
            ("min_roe", self.min_roe),
            ("max_price_per_book_value", self.max_price_per_book_value),
            ("max_debt_per_capital", self.max_debt_per_capital),
        ];
        for (field, value) in thresholds {
            if let Some(value) = value {
                finite(field, value)?;
            }
        }

        let ranges = [
            ("yield_range", self.yield_range),
            ("price_range", self.price_range),
            ("pe_range", self.pe_range),
        ];
        for (field, range) in ranges {
            if let Some(range) = range {
                range.validate(field)?;
            }
        }

        Ok(())
    }

    /// Numeric conditions in a fixed order, one per affected column.
    #[must_use]
    pub fn conditions(&self) -> Vec<FieldCondition> {
        let mut conditions = Vec::new();
        let mut push = |field: StockField, bound: Bound| {
            conditions.push(FieldCondition { field, bound });
        };

        if let Some(years) = self.min_streak_years {
            push(StockField::NoYears, Bound::AtLeast(years));
        }
        if let Some(range) = self.yield_range {
            for field in YIELD_FIELDS {
                push(field, Bound::Within(range));
            }
        }
        if let Some(dgr) = self.min_dgr {
            for field in DGR_FIELDS {
                push(field, Bound::AtLeast(dgr));
            }
        }
        if let Some(chowder) = self.min_chowder_number {
            push(StockField::ChowderNumber, Bound::AtLeast(chowder));
        }
        if let Some(range) = self.price_range {
            push(StockField::Price, Bound::Within(range));
        }
        if let Some(fair_value) = self.max_fair_value {
            push(StockField::FvPercent, Bound::AtMost(fair_value));
        }
        if let Some(eps) = self.min_eps {
            push(StockField::Eps1y, Bound::AtLeast(eps));
        }
        if let Some(revenue) = self.min_revenue {
            push(StockField::Revenue1y, Bound::AtLeast(revenue));
        }
        if let Some(npm) = self.min_npm {
            push(StockField::Npm, Bound::AtLeast(npm));
        }
        if let Some(cf) = self.min_cf_per_share {
            push(StockField::CfPerShare, Bound::AtLeast(cf));
        }
        if let Some(roe) = self.min_roe {
            push(StockField::Roe, Bound::AtLeast(roe));
        }
        if let Some(range) = self.pe_range {
            push(StockField::Pe, Bound::Within(range));
        }
        if let Some(pbv) = self.max_price_per_book_value {
            push(StockField::Pbv, Bound::AtMost(pbv));
        }
        if let Some(debt) = self.max_debt_per_capital {
            push(StockField::DebtPerCapital, Bound::AtMost(debt));
        }

        conditions
    }

    /// Non-empty exclusion lists only.
    #[must_use]
    pub fn exclusions(&self) -> Vec<Exclusion<'_>> {
        [
            (StockField::Symbol, &self.excluded_symbols),
            (StockField::Sector, &self.excluded_sectors),
            (StockField::Industry, &self.excluded_industries),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(field, values)| Exclusion {
            field,
            values: values.as_slice(),
        })
        .collect()
    }

    /// Evaluate the criteria against one record in memory.
    #[must_use]
    pub fn matches(&self, record: &StockRecord) -> bool {
        self.conditions()
            .iter()
            .all(|condition| condition.bound.admits(record.numeric(condition.field)))
            && self
                .exclusions()
                .iter()
                .all(|exclusion| exclusion.admits(record.text(exclusion.field)))
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}
