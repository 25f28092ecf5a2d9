//! Column extremes and distinct values used to bound filter inputs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use divifilter_warehouse::{Aggregate, StockField};

use crate::criteria::NumericRange;
use crate::error::{CoreError, ValidationError};
use crate::store::RowStore;

/// Which end of a column's value range to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    const fn aggregate(self) -> Aggregate {
        match self {
            Self::Min => Aggregate::Min,
            Self::Max => Aggregate::Max,
        }
    }
}

impl FromStr for Extreme {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(ValidationError::InvalidSelector {
                value: other.to_string(),
            }),
        }
    }
}

impl Display for Extreme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a column name or key against the catalog.
pub fn resolve_field(name: &str) -> Result<StockField, ValidationError> {
    StockField::lookup(name).ok_or_else(|| ValidationError::UnknownField {
        name: name.to_string(),
    })
}

fn numeric_field(name: &str) -> Result<StockField, ValidationError> {
    let field = resolve_field(name)?;
    if !field.is_numeric() {
        return Err(ValidationError::NotNumeric {
            field: field.sql_name().to_string(),
        });
    }
    Ok(field)
}

/// Read-only metadata queries over a row store.
#[derive(Debug, Clone)]
pub struct MetadataAccessor<S> {
    store: S,
}

impl<S: RowStore> MetadataAccessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Min or max of `field` across rows that carry a dividend yield.
    ///
    /// `which` must be `"min"` or `"max"`. `Ok(None)` means no row qualified.
    pub fn extreme(&self, field: &str, which: &str) -> Result<Option<f64>, CoreError> {
        let which = which.parse::<Extreme>()?;
        let field = numeric_field(field)?;
        self.extreme_of(field, which)
    }

    /// Typed form of [`extreme`](Self::extreme).
    pub fn extreme_of(&self, field: StockField, which: Extreme) -> Result<Option<f64>, CoreError> {
        if !field.is_numeric() {
            return Err(ValidationError::NotNumeric {
                field: field.sql_name().to_string(),
            }
            .into());
        }

        let value = self
            .store
            .aggregate(which.aggregate(), field, StockField::PRESENCE)?;
        tracing::debug!(field = %field, which = %which, ?value, "column extreme");
        Ok(value)
    }

    /// Distinct non-null values of any catalog field, in sorted order.
    ///
    /// Numeric values come back in their shortest decimal form (`10`, `2.5`).
    pub fn distinct_values(&self, field: &str) -> Result<BTreeSet<String>, CoreError> {
        let field = resolve_field(field)?;
        Ok(self.store.distinct(field)?.into_iter().collect())
    }

    /// Combined `[min, max]` across several numeric fields.
    ///
    /// Fields without any value are skipped. `Ok(None)` when all are empty.
    pub fn bounds(&self, fields: &[&str]) -> Result<Option<NumericRange>, CoreError> {
        if fields.is_empty() {
            return Err(ValidationError::NoFields.into());
        }
        let fields = fields
            .iter()
            .map(|name| numeric_field(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut combined: Option<NumericRange> = None;
        for field in fields {
            let min = self.extreme_of(field, Extreme::Min)?;
            let max = self.extreme_of(field, Extreme::Max)?;
            let (Some(min), Some(max)) = (min, max) else {
                continue;
            };
            combined = Some(match combined {
                Some(range) => NumericRange::new(range.min.min(min), range.max.max(max)),
                None => NumericRange::new(min, max),
            });
        }
        Ok(combined)
    }

    /// Every symbol in the store.
    pub fn symbols(&self) -> Result<BTreeSet<String>, CoreError> {
        Ok(self.store.distinct(StockField::Symbol)?.into_iter().collect())
    }

    /// Last update time per data source.
    pub fn update_times(&self) -> Result<BTreeMap<String, String>, CoreError> {
        Ok(self.store.update_times()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use divifilter_warehouse::StockRecord;

    fn accessor() -> MetadataAccessor<MemoryStore> {
        MetadataAccessor::new(MemoryStore::new(vec![
            StockRecord::new("A")
                .with(StockField::DivYield, 1.0)
                .with(StockField::Pe, 5.0)
                .with_text(StockField::Sector, "Energy"),
            StockRecord::new("B").with(StockField::DivYield, 2.0),
            StockRecord::new("C")
                .with(StockField::DivYield, 3.0)
                .with(StockField::Pe, 12.0)
                .with_text(StockField::Sector, "Utilities"),
            StockRecord::new("D")
                .with(StockField::DivYield, 4.0)
                .with(StockField::Pe, 3.0)
                .with(StockField::AvgYield5y, 7.5),
            StockRecord::new("E").with(StockField::Pe, 99.0),
        ]))
    }

    #[test]
    fn selector_parsing_is_exact() {
        assert_eq!("min".parse::<Extreme>(), Ok(Extreme::Min));
        assert_eq!("max".parse::<Extreme>(), Ok(Extreme::Max));
        assert!("MAX".parse::<Extreme>().is_err());
        assert!("avg".parse::<Extreme>().is_err());
    }

    #[test]
    fn extreme_ignores_nulls_and_rows_without_yield() {
        let accessor = accessor();
        assert_eq!(accessor.extreme("P/E", "max").expect("max"), Some(12.0));
        assert_eq!(accessor.extreme("pe", "min").expect("min"), Some(3.0));
    }

    #[test]
    fn invalid_selector_is_invalid_argument() {
        let error = accessor().extreme("P/E", "invalid").expect_err("selector");
        assert!(matches!(
            error,
            CoreError::InvalidArgument(ValidationError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn extreme_rejects_categorical_and_unknown_fields() {
        let accessor = accessor();
        assert!(matches!(
            accessor.extreme("Sector", "max"),
            Err(CoreError::InvalidArgument(ValidationError::NotNumeric { .. }))
        ));
        assert!(matches!(
            accessor.extreme("Dividend", "max"),
            Err(CoreError::InvalidArgument(ValidationError::UnknownField { .. }))
        ));
    }

    #[test]
    fn distinct_values_are_sorted_and_skip_nulls() {
        let values = accessor().distinct_values("Sector").expect("distinct");
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            vec!["Energy", "Utilities"]
        );
    }

    #[test]
    fn distinct_values_accepts_numeric_fields() {
        let values = accessor().distinct_values("P/E").expect("distinct");
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            vec!["12", "3", "5", "99"]
        );
    }

    #[test]
    fn distinct_values_rejects_unknown_fields() {
        assert!(matches!(
            accessor().distinct_values("Dividend"),
            Err(CoreError::InvalidArgument(ValidationError::UnknownField { .. }))
        ));
    }

    #[test]
    fn bounds_span_all_fields_and_skip_empty_ones() {
        let accessor = accessor();
        let range = accessor
            .bounds(&["Div Yield", "5Y Avg Yield", "DGR 10Y"])
            .expect("bounds");
        assert_eq!(range, Some(NumericRange::new(1.0, 7.5)));

        assert_eq!(accessor.bounds(&["DGR 10Y"]).expect("empty"), None);
        assert!(accessor.bounds(&[]).is_err());
    }
}
