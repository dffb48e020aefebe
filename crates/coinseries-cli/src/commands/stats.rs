use coinseries_core::{ServiceError, SummaryOutcome, TimeseriesService};

use crate::cli::StatsArgs;
use crate::error::CliError;
use crate::output::Body;

use super::CommandResult;

pub async fn run(args: &StatsArgs, service: &TimeseriesService) -> Result<CommandResult, CliError> {
    let outcome = service
        .get_summary_stats(&args.coin, args.start_date, args.end_date)
        .await?;

    match outcome {
        SummaryOutcome::Found(stats) => Ok(CommandResult::for_coin(
            &args.coin,
            Body::Stats(serde_json::to_value(stats)?),
        )),
        SummaryOutcome::NoData => Err(ServiceError::not_found(format!(
            "no summary data for {} in the requested range",
            args.coin.trim()
        ))
        .into()),
    }
}
