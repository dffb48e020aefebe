//! # Coinseries Warehouse
//!
//! DuckDB-backed record store for crypto price/volume history.
//!
//! ## Overview
//!
//! This crate owns the relational side of coinseries: the schema of the
//! `historical_data` table, the translation of lookup parameters into
//! parameterized SQL, and the [`TimeseriesStore`] contract the query service
//! depends on. It only reads records; ingestion happens elsewhere.
//!
//! ### Features
//!
//! - 🔒 **Secure SQL**: every caller-supplied value is a bound parameter
//! - 📅 **Whole-day end dates**: filtered `end_date` covers the full calendar day
//! - 🔄 **Connection Pooling**: cloned connections over one database instance
//! - ⚡ **Query Guardrails**: optional row cap and elapsed-time budget
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinseries_warehouse::{FilterCriteria, Warehouse};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!
//!     let criteria = FilterCriteria {
//!         min_price: Some(30_000.0),
//!         ..FilterCriteria::default()
//!     };
//!     let records = warehouse.filtered_records("bitcoin", &criteria)?;
//!
//!     println!("Found {} records", records.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `historical_data` | One row per `(coin_id, timestamp)` with nullable price and volume |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod error;
pub mod migrations;
pub mod models;
pub mod query;
pub mod store;
pub mod timestamp;

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ::duckdb::{params_from_iter, Connection};
use time::Date;
use tracing::debug;

pub use crate::duckdb::{DuckDbConnectionManager, PooledConnection};
pub use error::WarehouseError;
pub use models::{FilterCriteria, HistoricalRecord, PaginationWindow, SummaryStats};
pub use query::BuiltQuery;
pub use store::{StoreFuture, TimeseriesStore};
pub use timestamp::RecordTimestamp;

/// Configuration for the record store.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Root directory for coinseries data.
    pub coinseries_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
    /// Limits applied to every record query.
    pub guardrails: QueryGuardrails,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let coinseries_home = resolve_coinseries_home();
        let db_path = env::var_os("COINSERIES_DB_PATH")
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| coinseries_home.join("timeseries.duckdb"));
        Self {
            coinseries_home,
            db_path,
            max_pool_size: 4,
            guardrails: QueryGuardrails::default(),
        }
    }
}

/// Guardrails for record queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryGuardrails {
    /// Reject queries that would return more rows than this. `None` is unbounded.
    pub max_rows: Option<usize>,
    /// Query time budget in milliseconds.
    pub query_timeout_ms: u64,
}

impl Default for QueryGuardrails {
    fn default() -> Self {
        Self {
            max_rows: None,
            query_timeout_ms: 5_000,
        }
    }
}

impl QueryGuardrails {
    fn timeout(self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.max(1))
    }

    fn validate(self) -> Result<(), WarehouseError> {
        if self.max_rows == Some(0) {
            return Err(WarehouseError::QueryRejected(String::from(
                "max_rows must be greater than zero",
            )));
        }
        if self.query_timeout_ms == 0 {
            return Err(WarehouseError::QueryRejected(String::from(
                "query_timeout_ms must be greater than zero",
            )));
        }
        Ok(())
    }
}

/// The DuckDB record store.
#[derive(Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a warehouse with the specified configuration.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        config.guardrails.validate()?;
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::open(config.db_path.clone(), config.max_pool_size)?;
        let warehouse = Self { config, manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Ensure the schema exists.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }

    pub fn guardrails(&self) -> QueryGuardrails {
        self.config.guardrails
    }

    /// Round-trip a trivial statement to prove the database answers.
    pub fn ping(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        let _: i32 = connection.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    /// Records of `asset_id` matching every present criterion, oldest first.
    pub fn filtered_records(
        &self,
        asset_id: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<HistoricalRecord>, WarehouseError> {
        let query = query::filtered(asset_id, criteria)?;
        let connection = self.manager.acquire()?;
        read_records(&connection, &query, self.config.guardrails)
    }

    /// Aggregates over `start_date <= timestamp <= end_date`, or `None` when
    /// no row matched.
    pub fn summary_stats(
        &self,
        asset_id: &str,
        start_date: Date,
        end_date: Date,
    ) -> Result<Option<SummaryStats>, WarehouseError> {
        let query = query::summary(asset_id, start_date, end_date)?;
        debug!(sql = query.sql(), params = query.params().len(), "executing summary query");

        let connection = self.manager.acquire()?;
        let (avg_price, total_volume, row_count) = connection.query_row(
            query.sql(),
            params_from_iter(query.params()),
            |row| {
                Ok((
                    row.get::<_, Option<f64>>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;

        if row_count == 0 {
            return Ok(None);
        }
        Ok(Some(SummaryStats {
            avg_price,
            total_volume,
        }))
    }

    /// One window of records ordered by ascending timestamp.
    pub fn paginated_records(
        &self,
        asset_id: &str,
        window: PaginationWindow,
    ) -> Result<Vec<HistoricalRecord>, WarehouseError> {
        let query = query::paginated(asset_id, window);
        let connection = self.manager.acquire()?;
        read_records(&connection, &query, self.config.guardrails)
    }

    /// Distinct asset ids in the store.
    pub fn asset_ids(&self) -> Result<BTreeSet<String>, WarehouseError> {
        let query = query::distinct_asset_ids();
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(query.sql())?;
        let ids = statement
            .query_map(params_from_iter(query.params()), |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(ids)
    }

    /// Run a blocking operation on tokio's blocking pool.
    fn run_blocking<T, F>(&self, operation: F) -> StoreFuture<'static, T>
    where
        T: Send + 'static,
        F: FnOnce(&Warehouse) -> Result<T, WarehouseError> + Send + 'static,
    {
        let warehouse = self.clone();
        Box::pin(async move { tokio::task::spawn_blocking(move || operation(&warehouse)).await? })
    }
}

impl TimeseriesStore for Warehouse {
    fn fetch_filtered<'a>(
        &'a self,
        asset_id: &'a str,
        criteria: FilterCriteria,
    ) -> StoreFuture<'a, Vec<HistoricalRecord>> {
        let asset_id = asset_id.to_owned();
        self.run_blocking(move |warehouse| warehouse.filtered_records(&asset_id, &criteria))
    }

    fn fetch_summary<'a>(
        &'a self,
        asset_id: &'a str,
        start_date: Date,
        end_date: Date,
    ) -> StoreFuture<'a, Option<SummaryStats>> {
        let asset_id = asset_id.to_owned();
        self.run_blocking(move |warehouse| warehouse.summary_stats(&asset_id, start_date, end_date))
    }

    fn fetch_paginated<'a>(
        &'a self,
        asset_id: &'a str,
        window: PaginationWindow,
    ) -> StoreFuture<'a, Vec<HistoricalRecord>> {
        let asset_id = asset_id.to_owned();
        self.run_blocking(move |warehouse| warehouse.paginated_records(&asset_id, window))
    }

    fn fetch_all_asset_ids(&self) -> StoreFuture<'_, BTreeSet<String>> {
        self.run_blocking(Warehouse::asset_ids)
    }
}

/// Execute a record query and decode rows under the guardrails.
fn read_records(
    connection: &Connection,
    query: &BuiltQuery,
    guardrails: QueryGuardrails,
) -> Result<Vec<HistoricalRecord>, WarehouseError> {
    debug!(sql = query.sql(), params = query.params().len(), "executing record query");
    let started = Instant::now();

    let mut statement = connection.prepare(query.sql())?;
    let mut rows = statement.query(params_from_iter(query.params()))?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        ensure_timeout(started, guardrails.timeout())?;

        if let Some(max_rows) = guardrails.max_rows {
            if records.len() >= max_rows {
                return Err(WarehouseError::QueryRejected(format!(
                    "result exceeds max_rows={max_rows}; narrow the filter"
                )));
            }
        }

        let raw_timestamp: String = row.get(1)?;
        records.push(HistoricalRecord {
            asset_id: row.get(0)?,
            timestamp: RecordTimestamp::parse(&raw_timestamp)?,
            price: row.get(2)?,
            volume: row.get(3)?,
        });
    }

    ensure_timeout(started, guardrails.timeout())?;
    Ok(records)
}

/// Ensure that the query has not exceeded the timeout.
fn ensure_timeout(started: Instant, timeout: Duration) -> Result<(), WarehouseError> {
    if started.elapsed() > timeout {
        return Err(WarehouseError::QueryTimeout {
            timeout_ms: timeout.as_millis().min(u128::from(u64::MAX)) as u64,
        });
    }
    Ok(())
}

/// Resolve the coinseries home directory from environment or default.
fn resolve_coinseries_home() -> PathBuf {
    if let Some(path) = env::var_os("COINSERIES_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".coinseries");
    }

    PathBuf::from(".coinseries")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};
    use time::macros::date;

    fn open_seeded(rows: &[(&str, &str, Option<f64>, Option<f64>)]) -> (TempDir, Warehouse) {
        open_seeded_with(rows, QueryGuardrails::default())
    }

    fn open_seeded_with(
        rows: &[(&str, &str, Option<f64>, Option<f64>)],
        guardrails: QueryGuardrails,
    ) -> (TempDir, Warehouse) {
        let temp = tempdir().expect("tempdir");
        let warehouse = Warehouse::open(WarehouseConfig {
            coinseries_home: temp.path().to_path_buf(),
            db_path: temp.path().join("timeseries.duckdb"),
            max_pool_size: 2,
            guardrails,
        })
        .expect("warehouse open");

        let connection = warehouse.manager.acquire().expect("connection");
        for (coin, ts, price, volume) in rows {
            connection
                .execute(
                    "INSERT INTO historical_data VALUES (?, CAST(? AS TIMESTAMP), ?, ?)",
                    ::duckdb::params![coin, ts, price, volume],
                )
                .expect("seed row");
        }
        drop(connection);
        (temp, warehouse)
    }

    fn timestamps(records: &[HistoricalRecord]) -> Vec<String> {
        records.iter().map(|r| r.timestamp.to_string()).collect()
    }

    #[test]
    fn initializes_record_table() {
        let (_temp, warehouse) = open_seeded(&[]);
        let connection = warehouse.manager.acquire().expect("connection");
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'historical_data'",
                [],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 1);
    }

    #[test]
    fn end_date_includes_last_second_of_day() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-02 23:59:59", Some(1.0), Some(1.0)),
            ("bitcoin", "2024-01-03 00:00:00", Some(2.0), Some(2.0)),
        ]);

        let criteria = FilterCriteria {
            end_date: Some(date!(2024 - 01 - 02)),
            ..FilterCriteria::default()
        };
        let records = warehouse
            .filtered_records("bitcoin", &criteria)
            .expect("filtered");

        assert_eq!(timestamps(&records), vec!["2024-01-02T23:59:59"]);
    }

    #[test]
    fn bounds_are_inclusive_and_conjunctive() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-01 00:00:00", Some(100.0), Some(10.0)),
            ("bitcoin", "2024-01-02 00:00:00", Some(200.0), Some(20.0)),
            ("bitcoin", "2024-01-03 00:00:00", Some(300.0), Some(30.0)),
            ("bitcoin", "2024-01-04 00:00:00", None, Some(20.0)),
            ("ethereum", "2024-01-02 00:00:00", Some(200.0), Some(20.0)),
        ]);

        let criteria = FilterCriteria {
            min_price: Some(100.0),
            max_price: Some(200.0),
            min_volume: Some(20.0),
            ..FilterCriteria::default()
        };
        let records = warehouse
            .filtered_records("bitcoin", &criteria)
            .expect("filtered");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].asset_id, "bitcoin");
        assert_eq!(records[0].price, Some(200.0));
    }

    #[test]
    fn summary_compares_raw_bounds_and_signals_no_rows() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-01 00:00:00", Some(40_000.0), Some(4_000.0)),
            ("bitcoin", "2024-01-04 00:00:00", Some(60_000.0), Some(6_000.0)),
            ("bitcoin", "2024-01-04 12:00:00", Some(90_000.0), Some(9_000.0)),
        ]);

        let stats = warehouse
            .summary_stats("bitcoin", date!(2024 - 01 - 01), date!(2024 - 01 - 04))
            .expect("summary")
            .expect("rows matched");
        assert_eq!(stats.avg_price, Some(50_000.0));
        assert_eq!(stats.total_volume, Some(10_000.0));

        let empty = warehouse
            .summary_stats("dogecoin", date!(2024 - 01 - 01), date!(2024 - 01 - 04))
            .expect("summary");
        assert_eq!(empty, None);
    }

    #[test]
    fn summary_keeps_zero_average_distinct_from_no_data() {
        let (_temp, warehouse) =
            open_seeded(&[("stable", "2024-01-01 00:00:00", Some(0.0), Some(0.0))]);

        let stats = warehouse
            .summary_stats("stable", date!(2024 - 01 - 01), date!(2024 - 01 - 02))
            .expect("summary");

        assert_eq!(
            stats,
            Some(SummaryStats {
                avg_price: Some(0.0),
                total_volume: Some(0.0),
            })
        );
    }

    #[test]
    fn pagination_orders_then_skips_then_limits() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-03 00:00:00", Some(3.0), None),
            ("bitcoin", "2024-01-01 00:00:00", Some(1.0), None),
            ("bitcoin", "2024-01-02 00:00:00", Some(2.0), None),
        ]);

        let page = warehouse
            .paginated_records("bitcoin", PaginationWindow::new(2, 1))
            .expect("page");

        assert_eq!(
            timestamps(&page),
            vec!["2024-01-02T00:00:00", "2024-01-03T00:00:00"]
        );
    }

    #[test]
    fn asset_ids_are_distinct() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-01 00:00:00", None, None),
            ("bitcoin", "2024-01-02 00:00:00", None, None),
            ("solana", "2024-01-01 00:00:00", None, None),
        ]);

        let ids = warehouse.asset_ids().expect("ids");

        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec!["bitcoin".to_string(), "solana".to_string()]
        );
    }

    #[test]
    fn row_cap_rejects_oversized_results() {
        let (_temp, warehouse) = open_seeded_with(
            &[
                ("bitcoin", "2024-01-01 00:00:00", Some(1.0), None),
                ("bitcoin", "2024-01-02 00:00:00", Some(2.0), None),
            ],
            QueryGuardrails {
                max_rows: Some(1),
                query_timeout_ms: 5_000,
            },
        );

        let error = warehouse
            .filtered_records("bitcoin", &FilterCriteria::default())
            .expect_err("should reject");

        assert!(matches!(error, WarehouseError::QueryRejected(_)));
    }

    #[test]
    fn zero_row_cap_is_rejected_at_open() {
        let temp = tempdir().expect("tempdir");
        let result = Warehouse::open(WarehouseConfig {
            coinseries_home: temp.path().to_path_buf(),
            db_path: temp.path().join("timeseries.duckdb"),
            max_pool_size: 1,
            guardrails: QueryGuardrails {
                max_rows: Some(0),
                query_timeout_ms: 5_000,
            },
        });

        assert!(matches!(result, Err(WarehouseError::QueryRejected(_))));
    }

    #[tokio::test]
    async fn store_trait_runs_queries_off_the_async_thread() {
        let (_temp, warehouse) = open_seeded(&[
            ("bitcoin", "2024-01-02 00:00:00", Some(51_000.0), Some(1_100.0)),
            ("bitcoin", "2024-01-01 00:00:00", Some(50_000.0), Some(1_000.0)),
        ]);
        let store: &dyn TimeseriesStore = &warehouse;

        let page = store
            .fetch_paginated("bitcoin", PaginationWindow::new(2, 0))
            .await
            .expect("page");
        let ids = store.fetch_all_asset_ids().await.expect("ids");

        assert_eq!(page[0].price, Some(50_000.0));
        assert_eq!(page[1].price, Some(51_000.0));
        assert!(ids.contains("bitcoin"));
        warehouse.ping().expect("ping");
    }
}
