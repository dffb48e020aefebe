use coinseries_core::{ServiceError, TimeseriesService};

use crate::cli::PageArgs;
use crate::error::CliError;
use crate::output::Body;

use super::CommandResult;

pub async fn run(args: &PageArgs, service: &TimeseriesService) -> Result<CommandResult, CliError> {
    let series = service
        .get_paginated_data(&args.coin, args.limit, args.offset)
        .await?;

    if series.is_empty() {
        return Err(ServiceError::not_found(format!(
            "no records for {} at offset {}",
            args.coin.trim(),
            args.offset
        ))
        .into());
    }

    Ok(CommandResult::for_coin(
        &args.coin,
        Body::Data(serde_json::to_value(series)?),
    ))
}
