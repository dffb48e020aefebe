//! Versioned schema for the record store.
//!
//! The store only declares the table; rows arrive through an external
//! ingestion process.

use ::duckdb::{params, Connection};

struct Migration {
    version: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_historical_data",
        sql: r#"
CREATE TABLE IF NOT EXISTS historical_data (
    coin_id VARCHAR(50) NOT NULL,
    timestamp TIMESTAMP NOT NULL,
    price DOUBLE,
    volume DOUBLE,
    PRIMARY KEY(coin_id, timestamp)
);
"#,
    },
    Migration {
        version: "0002_historical_data_ts_index",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_historical_data_timestamp ON historical_data(timestamp);
"#,
    },
];

/// Apply pending migrations. Safe to call on every open.
///
/// # Errors
/// Returns an error if any DDL statement fails.
pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            params![migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                params![migration.version],
            )?;
        }
    }

    Ok(())
}
