//! Validation and response shaping in front of a [`TimeseriesStore`].
//!
//! Every operation is validate → execute → shape. Validation failures never
//! reach the store; store faults come back as
//! [`ServiceError::ExecutionFailure`]; empty matches are successful results.
//!
//! Asset ids are matched after trimming surrounding whitespace (see
//! [`AssetId`]), so the store only ever sees the trimmed id.

use std::collections::BTreeSet;
use std::sync::Arc;

use coinseries_warehouse::{
    FilterCriteria, HistoricalRecord, PaginationWindow, TimeseriesStore, WarehouseError,
};
use time::Date;
use tracing::{debug, warn};

use crate::{AssetId, ServiceError, SummaryOutcome, TimeSeries};

const SUMMARY_ARGS_MESSAGE: &str = "asset id, start_date, and end_date must be provided";
const PAGINATION_ARGS_MESSAGE: &str = "asset id must be provided, limit > 0, and offset >= 0";

/// Query service over historical price/volume records.
#[derive(Clone)]
pub struct TimeseriesService {
    store: Arc<dyn TimeseriesStore>,
}

impl TimeseriesService {
    pub fn new(store: Arc<dyn TimeseriesStore>) -> Self {
        Self { store }
    }

    /// Records of one asset matching every present criterion.
    ///
    /// Surrounding whitespace is trimmed from `asset_id` before the store is
    /// queried. No match is an empty vector, never an error.
    pub async fn get_filtered_data(
        &self,
        asset_id: &str,
        criteria: FilterCriteria,
    ) -> Result<Vec<HistoricalRecord>, ServiceError> {
        let asset_id = AssetId::parse(asset_id)?;
        debug!(asset_id = %asset_id, ?criteria, "fetching filtered records");

        self.store
            .fetch_filtered(asset_id.as_str(), criteria)
            .await
            .map_err(|cause| execution_failure(Some(&asset_id), "fetch_filtered", cause))
    }

    /// Average price and total volume between two dates, both required.
    pub async fn get_summary_stats(
        &self,
        asset_id: &str,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<SummaryOutcome, ServiceError> {
        let (Ok(asset_id), Some(start_date), Some(end_date)) =
            (AssetId::parse(asset_id), start_date, end_date)
        else {
            return Err(ServiceError::invalid_argument(SUMMARY_ARGS_MESSAGE));
        };
        debug!(asset_id = %asset_id, %start_date, %end_date, "fetching summary");

        let stats = self
            .store
            .fetch_summary(asset_id.as_str(), start_date, end_date)
            .await
            .map_err(|cause| execution_failure(Some(&asset_id), "fetch_summary", cause))?;
        Ok(SummaryOutcome::from_store(stats))
    }

    /// One page of an asset's records in ascending time order, as columns.
    pub async fn get_paginated_data(
        &self,
        asset_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<TimeSeries, ServiceError> {
        let asset_id = match AssetId::parse(asset_id) {
            Ok(asset_id) if limit > 0 && offset >= 0 => asset_id,
            _ => return Err(ServiceError::invalid_argument(PAGINATION_ARGS_MESSAGE)),
        };
        debug!(asset_id = %asset_id, limit, offset, "fetching page");

        let records = self
            .store
            .fetch_paginated(asset_id.as_str(), PaginationWindow::new(limit, offset))
            .await
            .map_err(|cause| execution_failure(Some(&asset_id), "fetch_paginated", cause))?;
        Ok(TimeSeries::from(records))
    }

    /// Every distinct asset id in the store.
    pub async fn get_all_coins(&self) -> Result<BTreeSet<String>, ServiceError> {
        self.store
            .fetch_all_asset_ids()
            .await
            .map_err(|cause| execution_failure(None, "fetch_all_asset_ids", cause))
    }
}

fn execution_failure(
    asset_id: Option<&AssetId>,
    operation: &'static str,
    cause: WarehouseError,
) -> ServiceError {
    warn!(
        asset_id = asset_id.map(AssetId::as_str).unwrap_or("*"),
        operation,
        error = %cause,
        "store query failed"
    );
    ServiceError::execution_failure(asset_id.map(AssetId::as_str), operation, cause)
}
