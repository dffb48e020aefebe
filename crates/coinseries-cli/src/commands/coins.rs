use coinseries_core::TimeseriesService;

use crate::error::CliError;
use crate::output::Body;

use super::CommandResult;

pub async fn run(service: &TimeseriesService) -> Result<CommandResult, CliError> {
    let coins = service.get_all_coins().await?;
    Ok(CommandResult::store_wide(Body::Data(serde_json::to_value(
        coins,
    )?)))
}
