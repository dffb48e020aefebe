mod coins;
mod health;
mod page;
mod series;
mod stats;

use std::sync::Arc;
use std::time::Instant;

use coinseries_core::{QueryGuardrails, TimeseriesService, Warehouse, WarehouseConfig};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::{Body, Envelope};

pub struct CommandResult {
    pub coin_id: Option<String>,
    pub body: Body,
}

impl CommandResult {
    pub fn for_coin(coin_id: &str, body: Body) -> Self {
        Self {
            coin_id: Some(coin_id.trim().to_owned()),
            body,
        }
    }

    pub fn store_wide(body: Body) -> Self {
        Self {
            coin_id: None,
            body,
        }
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let started = Instant::now();
    let warehouse = Warehouse::open(warehouse_config(cli))?;
    info!(
        command = cli.command.name(),
        db = %warehouse.db_path().display(),
        "dispatching command"
    );
    let service = TimeseriesService::new(Arc::new(warehouse.clone()));

    let CommandResult { coin_id, body } = match &cli.command {
        Command::Series(args) => series::run(args, &service).await?,
        Command::Stats(args) => stats::run(args, &service).await?,
        Command::Page(args) => page::run(args, &service).await?,
        Command::Coins => coins::run(&service).await?,
        Command::Health => health::run(&warehouse)?,
    };

    Ok(Envelope {
        coin_id,
        body,
        meta: Metadata::since(started),
    })
}

fn warehouse_config(cli: &Cli) -> WarehouseConfig {
    let mut config = WarehouseConfig::default();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    config.guardrails = QueryGuardrails {
        max_rows: cli.max_rows,
        query_timeout_ms: cli.query_timeout_ms,
    };
    config
}
