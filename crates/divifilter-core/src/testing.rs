use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use divifilter_warehouse::{Aggregate, Predicate, StockField, StockRecord, WarehouseError};

use crate::store::RowStore;

/// Row store over a fixed vector. `scan` returns every row unfiltered and
/// remembers the predicate it was given.
pub(crate) struct MemoryStore {
    rows: Vec<StockRecord>,
    last_predicate: RefCell<Option<Predicate>>,
}

impl MemoryStore {
    pub(crate) fn new(rows: Vec<StockRecord>) -> Self {
        Self {
            rows,
            last_predicate: RefCell::new(None),
        }
    }

    pub(crate) fn last_predicate(&self) -> Option<Predicate> {
        self.last_predicate.borrow().clone()
    }
}

impl RowStore for MemoryStore {
    fn aggregate(
        &self,
        function: Aggregate,
        field: StockField,
        presence: StockField,
    ) -> Result<Option<f64>, WarehouseError> {
        let values = self
            .rows
            .iter()
            .filter(|row| row.numeric(presence).is_some())
            .filter_map(|row| row.numeric(field));
        Ok(match function {
            Aggregate::Min => values.reduce(f64::min),
            Aggregate::Max => values.reduce(f64::max),
        })
    }

    fn distinct(&self, field: StockField) -> Result<Vec<String>, WarehouseError> {
        let values: BTreeSet<String> = self
            .rows
            .iter()
            .filter_map(|row| {
                row.text(field)
                    .map(str::to_string)
                    .or_else(|| row.numeric(field).map(|value| value.to_string()))
            })
            .collect();
        Ok(values.into_iter().collect())
    }

    fn scan(&self, predicate: &Predicate) -> Result<Vec<StockRecord>, WarehouseError> {
        *self.last_predicate.borrow_mut() = Some(predicate.clone());
        Ok(self.rows.clone())
    }

    fn update_times(&self) -> Result<BTreeMap<String, String>, WarehouseError> {
        Ok(BTreeMap::new())
    }
}
