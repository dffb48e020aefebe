use serde::{Deserialize, Serialize};
use time::Date;

use crate::RecordTimestamp;

/// One stored observation. Identity is `(asset_id, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Coin identifier (e.g., "bitcoin").
    pub asset_id: String,
    /// Observation time, second precision.
    pub timestamp: RecordTimestamp,
    /// Price, if recorded.
    pub price: Option<f64>,
    /// Traded volume, if recorded.
    pub volume: Option<f64>,
}

/// Optional inclusive bounds for a filtered fetch.
///
/// Every field is independent; `None` puts no constraint on that dimension.
/// `end_date` covers the whole calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterCriteria {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_volume: Option<f64>,
    pub max_volume: Option<f64>,
}

impl FilterCriteria {
    /// True when no field is set.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// Aggregates over one asset and one closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub avg_price: Option<f64>,
    pub total_volume: Option<f64>,
}

/// `LIMIT`/`OFFSET` over records ordered by ascending timestamp.
///
/// Signed so callers can express (and the service can reject) negative input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PaginationWindow {
    pub const fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}
