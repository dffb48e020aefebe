use coinseries_core::Warehouse;
use serde::Serialize;

use crate::error::CliError;
use crate::output::Body;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    db_path: String,
}

pub fn run(warehouse: &Warehouse) -> Result<CommandResult, CliError> {
    warehouse.ping()?;

    let report = HealthReport {
        status: "ok",
        db_path: warehouse.db_path().display().to_string(),
    };
    Ok(CommandResult::store_wide(Body::Data(serde_json::to_value(
        report,
    )?)))
}
