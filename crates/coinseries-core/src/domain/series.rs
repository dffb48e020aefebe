use coinseries_warehouse::{HistoricalRecord, RecordTimestamp, SummaryStats};
use serde::{Deserialize, Serialize};

/// Columnar view of an ordered record sequence.
///
/// Index `i` of each vector describes the same record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub timestamps: Vec<RecordTimestamp>,
    pub prices: Vec<Option<f64>>,
    pub volumes: Vec<Option<f64>>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl From<Vec<HistoricalRecord>> for TimeSeries {
    fn from(records: Vec<HistoricalRecord>) -> Self {
        let mut series = Self {
            timestamps: Vec::with_capacity(records.len()),
            prices: Vec::with_capacity(records.len()),
            volumes: Vec::with_capacity(records.len()),
        };
        for record in records {
            series.timestamps.push(record.timestamp);
            series.prices.push(record.price);
            series.volumes.push(record.volume);
        }
        series
    }
}

/// Result of a summary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stats", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Found(SummaryStats),
    /// No row matched, or every matched aggregate was NULL.
    NoData,
}

impl SummaryOutcome {
    pub(crate) fn from_store(stats: Option<SummaryStats>) -> Self {
        match stats {
            Some(SummaryStats {
                avg_price: None,
                total_volume: None,
            })
            | None => Self::NoData,
            Some(stats) => Self::Found(stats),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn stats(&self) -> Option<&SummaryStats> {
        match self {
            Self::Found(stats) => Some(stats),
            Self::NoData => None,
        }
    }
}
