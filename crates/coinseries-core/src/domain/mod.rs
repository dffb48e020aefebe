//! # Domain Models
//!
//! Request and response shapes used by the query service.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`AssetId`] | Validated, non-empty coin identifier |
//! | [`TimeSeries`] | Columnar `timestamps`/`prices`/`volumes` |
//! | [`SummaryOutcome`] | Aggregates or an explicit no-data tag |
//!
//! Record-level types (`HistoricalRecord`, `FilterCriteria`, `SummaryStats`,
//! `PaginationWindow`) live in `coinseries-warehouse` and are re-exported from
//! the crate root.

mod asset;
mod series;

pub use asset::AssetId;
pub use series::{SummaryOutcome, TimeSeries};
