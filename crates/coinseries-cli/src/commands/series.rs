use coinseries_core::{FilterCriteria, HistoricalRecord, RecordTimestamp, TimeseriesService};
use serde::Serialize;

use crate::cli::SeriesArgs;
use crate::error::CliError;
use crate::output::Body;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SeriesRow {
    timestamp: RecordTimestamp,
    price: Option<f64>,
    volume: Option<f64>,
}

impl From<HistoricalRecord> for SeriesRow {
    fn from(record: HistoricalRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            price: record.price,
            volume: record.volume,
        }
    }
}

pub async fn run(args: &SeriesArgs, service: &TimeseriesService) -> Result<CommandResult, CliError> {
    let criteria = FilterCriteria {
        start_date: args.start_date,
        end_date: args.end_date,
        min_price: args.min_price,
        max_price: args.max_price,
        min_volume: args.min_volume,
        max_volume: args.max_volume,
    };

    let rows = service
        .get_filtered_data(&args.coin, criteria)
        .await?
        .into_iter()
        .map(SeriesRow::from)
        .collect::<Vec<_>>();

    Ok(CommandResult::for_coin(
        &args.coin,
        Body::Data(serde_json::to_value(rows)?),
    ))
}
