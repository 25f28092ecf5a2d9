//! Explicit context object owning the row store.

use divifilter_warehouse::{Warehouse, WarehouseConfig};

use crate::engine::FilterEngine;
use crate::error::CoreError;
use crate::metadata::MetadataAccessor;

/// An open dividend screener: one warehouse plus the views over it.
#[derive(Clone)]
pub struct Screener {
    warehouse: Warehouse,
}

impl Screener {
    /// Open the warehouse described by `config`.
    pub fn open(config: WarehouseConfig) -> Result<Self, CoreError> {
        let warehouse = Warehouse::open(config)?;
        Ok(Self { warehouse })
    }

    /// Screener over a private in-memory store.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let warehouse = Warehouse::open_in_memory()?;
        Ok(Self { warehouse })
    }

    /// Wrap an already opened warehouse.
    pub fn with_warehouse(warehouse: Warehouse) -> Self {
        Self { warehouse }
    }

    pub fn metadata(&self) -> MetadataAccessor<&Warehouse> {
        MetadataAccessor::new(&self.warehouse)
    }

    pub fn engine(&self) -> FilterEngine<&Warehouse> {
        FilterEngine::new(&self.warehouse)
    }

    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    /// Release the store. Clones of this screener stop working as well.
    pub fn close(self) {
        self.warehouse.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::FilterCriteria;
    use crate::error::ErrorKind;
    use divifilter_warehouse::{StockField, StockRecord};

    #[test]
    fn views_share_one_store() {
        let screener = Screener::open_in_memory().expect("open");
        screener
            .warehouse()
            .upsert_stocks(&[
                StockRecord::new("KO").with(StockField::DivYield, 3.1),
                StockRecord::new("T").with(StockField::DivYield, 6.5),
            ])
            .expect("seed");

        assert_eq!(
            screener.metadata().extreme("Div Yield", "max").expect("max"),
            Some(6.5)
        );
        let results = screener
            .engine()
            .apply(&FilterCriteria::default())
            .expect("apply");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn closed_screener_is_unavailable() {
        let screener = Screener::open_in_memory().expect("open");
        let other = screener.clone();
        screener.close();

        let error = other
            .engine()
            .apply(&FilterCriteria::default())
            .expect_err("closed");
        assert_eq!(error.kind(), ErrorKind::Unavailable);
    }
}
