//! The row store seam consumed by the accessor and the engine.

use std::collections::BTreeMap;

use divifilter_warehouse::{Aggregate, Predicate, StockField, StockRecord, Warehouse, WarehouseError};

/// Read operations a backing row store must support.
pub trait RowStore {
    /// `MIN`/`MAX` of `field` over rows where `presence` is not null.
    fn aggregate(
        &self,
        function: Aggregate,
        field: StockField,
        presence: StockField,
    ) -> Result<Option<f64>, WarehouseError>;

    /// Distinct non-null values of `field`.
    fn distinct(&self, field: StockField) -> Result<Vec<String>, WarehouseError>;

    /// All rows matching `predicate`.
    fn scan(&self, predicate: &Predicate) -> Result<Vec<StockRecord>, WarehouseError>;

    /// Last update time per data source.
    fn update_times(&self) -> Result<BTreeMap<String, String>, WarehouseError>;
}

impl RowStore for Warehouse {
    fn aggregate(
        &self,
        function: Aggregate,
        field: StockField,
        presence: StockField,
    ) -> Result<Option<f64>, WarehouseError> {
        Warehouse::aggregate(self, function, field, presence)
    }

    fn distinct(&self, field: StockField) -> Result<Vec<String>, WarehouseError> {
        Warehouse::distinct(self, field)
    }

    fn scan(&self, predicate: &Predicate) -> Result<Vec<StockRecord>, WarehouseError> {
        Warehouse::scan(self, predicate)
    }

    fn update_times(&self) -> Result<BTreeMap<String, String>, WarehouseError> {
        Warehouse::update_times(self)
    }
}

impl<S: RowStore + ?Sized> RowStore for &S {
    fn aggregate(
        &self,
        function: Aggregate,
        field: StockField,
        presence: StockField,
    ) -> Result<Option<f64>, WarehouseError> {
        (**self).aggregate(function, field, presence)
    }

    fn distinct(&self, field: StockField) -> Result<Vec<String>, WarehouseError> {
        (**self).distinct(field)
    }

    fn scan(&self, predicate: &Predicate) -> Result<Vec<StockRecord>, WarehouseError> {
        (**self).scan(predicate)
    }

    fn update_times(&self) -> Result<BTreeMap<String, String>, WarehouseError> {
        (**self).update_times()
    }
}
