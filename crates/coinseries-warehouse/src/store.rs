//! Record store contract consumed by the query service.
//!
//! # Operations
//!
//! | Method | Returns | Notes |
//! |--------|---------|-------|
//! | [`fetch_filtered`](TimeseriesStore::fetch_filtered) | records | AND of present criteria, `end_date` whole day |
//! | [`fetch_summary`](TimeseriesStore::fetch_summary) | `Option<SummaryStats>` | `None` when no row matched |
//! | [`fetch_paginated`](TimeseriesStore::fetch_paginated) | records | ascending timestamp, then offset, then limit |
//! | [`fetch_all_asset_ids`](TimeseriesStore::fetch_all_asset_ids) | asset ids | distinct |
//!
//! Implementations never validate business-level input and never classify
//! failures; any fault comes back as a [`WarehouseError`].

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{FilterCriteria, HistoricalRecord, PaginationWindow, SummaryStats, WarehouseError};

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, WarehouseError>> + Send + 'a>>;

/// Read-only access to historical price/volume records.
///
/// Implementations must be `Send + Sync`; one handle is shared by every
/// in-flight request.
pub trait TimeseriesStore: Send + Sync {
    /// Records of `asset_id` satisfying every present field of `criteria`.
    fn fetch_filtered<'a>(
        &'a self,
        asset_id: &'a str,
        criteria: FilterCriteria,
    ) -> StoreFuture<'a, Vec<HistoricalRecord>>;

    /// Average price and total volume with `start_date <= timestamp <= end_date`.
    fn fetch_summary<'a>(
        &'a self,
        asset_id: &'a str,
        start_date: Date,
        end_date: Date,
    ) -> StoreFuture<'a, Option<SummaryStats>>;

    /// One window of `asset_id`'s records in ascending timestamp order.
    fn fetch_paginated<'a>(
        &'a self,
        asset_id: &'a str,
        window: PaginationWindow,
    ) -> StoreFuture<'a, Vec<HistoricalRecord>>;

    /// Distinct asset ids across the whole store.
    fn fetch_all_asset_ids(&self) -> StoreFuture<'_, BTreeSet<String>>;
}
