//! Predicate construction and filtered scans.

use std::collections::BTreeMap;

use divifilter_warehouse::{Predicate, SqlParam, StockRecord};

use crate::criteria::{Bound, FilterCriteria};
use crate::error::{CoreError, ValidationError};
use crate::store::RowStore;

/// Matching rows keyed by symbol.
pub type ResultSet = BTreeMap<String, StockRecord>;

/// Turn criteria into a parameterized WHERE predicate.
///
/// Every numeric condition admits nulls. Empty exclusion lists emit nothing.
/// Values are bound; only catalog identifiers appear in the clause text.
pub fn build_predicate(criteria: &FilterCriteria) -> Result<Predicate, ValidationError> {
    criteria.validate()?;

    let mut predicate = Predicate::new();
    for condition in criteria.conditions() {
        let column = condition.field.quoted();
        match condition.bound {
            Bound::AtLeast(threshold) => predicate.push(
                format!("({column} >= ? OR {column} IS NULL)"),
                [SqlParam::Double(threshold)],
            ),
            Bound::AtMost(ceiling) => predicate.push(
                format!("({column} <= ? OR {column} IS NULL)"),
                [SqlParam::Double(ceiling)],
            ),
            Bound::Within(range) => predicate.push(
                format!("({column} BETWEEN ? AND ? OR {column} IS NULL)"),
                [SqlParam::Double(range.min), SqlParam::Double(range.max)],
            ),
        }
    }

    for exclusion in criteria.exclusions() {
        let column = exclusion.field.quoted();
        let placeholders = vec!["?"; exclusion.values.len()].join(", ");
        predicate.push(
            format!("({column} NOT IN ({placeholders}) OR {column} IS NULL)"),
            exclusion
                .values
                .iter()
                .map(|value| SqlParam::Text(value.clone())),
        );
    }

    Ok(predicate)
}

/// Runs filter criteria against a row store.
#[derive(Debug, Clone)]
pub struct FilterEngine<S> {
    store: S,
}

impl<S: RowStore> FilterEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Rows satisfying every condition in `criteria`, keyed by symbol.
    ///
    /// A later row with the same symbol replaces an earlier one.
    pub fn apply(&self, criteria: &FilterCriteria) -> Result<ResultSet, CoreError> {
        let predicate = build_predicate(criteria)?;
        tracing::debug!(%predicate, params = predicate.params().len(), "filter predicate");

        let rows = self.store.scan(&predicate)?;
        let mut results = ResultSet::new();
        for row in rows {
            results.insert(row.symbol.clone(), row);
        }

        tracing::info!(matches = results.len(), "filter applied");
        Ok(results)
    }
}
