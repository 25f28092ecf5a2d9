//! # Divifilter Core
//!
//! Filter criteria, predicate construction, and metadata queries for the
//! divifilter dividend stock screener.
//!
//! ## Overview
//!
//! Two views sit on top of a [`RowStore`]:
//!
//! - **[`MetadataAccessor`]** reads column extremes and distinct values so
//!   callers can bound their filter inputs
//! - **[`FilterEngine`]** turns [`FilterCriteria`] into a parameterized
//!   predicate and returns the matching rows keyed by symbol
//!
//! A missing numeric value never excludes a row. Only an explicit
//! out-of-range value does.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`criteria`] | Filter criteria, bounds, and in-memory evaluation |
//! | [`engine`] | Predicate builder and filter engine |
//! | [`error`] | Core error types |
//! | [`metadata`] | Column extremes and distinct values |
//! | [`screener`] | Context object owning the warehouse |
//! | [`store`] | Row store trait |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use divifilter_core::{FilterCriteria, NumericRange, Screener};
//! use divifilter_warehouse::WarehouseConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let screener = Screener::open(WarehouseConfig::default())?;
//!
//!     let max_yield = screener.metadata().extreme("Div Yield", "max")?;
//!     let criteria = FilterCriteria {
//!         min_streak_years: Some(10.0),
//!         yield_range: Some(NumericRange::new(0.0, max_yield.unwrap_or(10.0))),
//!         ..FilterCriteria::default()
//!     };
//!
//!     for (symbol, record) in screener.engine().apply(&criteria)? {
//!         println!("{symbol}: {:?}", record.div_yield);
//!     }
//!
//!     screener.close();
//!     Ok(())
//! }
//! ```

pub mod criteria;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod screener;
pub mod store;

#[cfg(test)]
mod testing;

pub use criteria::{Bound, Exclusion, FieldCondition, FilterCriteria, NumericRange};
pub use engine::{build_predicate, FilterEngine, ResultSet};
pub use error::{CoreError, ErrorKind, ValidationError};
pub use metadata::{resolve_field, Extreme, MetadataAccessor};
pub use screener::Screener;
pub use store::RowStore;
