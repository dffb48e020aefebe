//! Translation of lookup parameters into bounded, parameterized SQL.
//!
//! SQL text is assembled only from the fixed fragments in this module. Every
//! caller-supplied value (asset id, dates, bounds, limit, offset) travels as a
//! bound parameter.

use ::duckdb::types::Value;
use time::Date;

use crate::{FilterCriteria, PaginationWindow, RecordTimestamp, WarehouseError};

/// Table holding one row per `(coin_id, timestamp)`.
pub const RECORD_TABLE: &str = "historical_data";

/// Projection shared by every record-returning query. The timestamp is
/// rendered as text so it can be decoded without driver-specific types.
const RECORD_COLUMNS: &str =
    "coin_id, strftime(timestamp, '%Y-%m-%d %H:%M:%S') AS ts, price, volume";

/// SQL text plus its positional parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<Value>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

struct QueryBuilder {
    head: String,
    conditions: Vec<&'static str>,
    params: Vec<Value>,
    tail: String,
}

impl QueryBuilder {
    fn new(projection: &str, asset_id: &str) -> Self {
        Self {
            head: format!("SELECT {projection} FROM {RECORD_TABLE}"),
            conditions: vec!["coin_id = ?"],
            params: vec![Value::Text(asset_id.to_owned())],
            tail: String::new(),
        }
    }

    fn condition(&mut self, fragment: &'static str, param: Value) -> &mut Self {
        self.conditions.push(fragment);
        self.params.push(param);
        self
    }

    fn optional(&mut self, fragment: &'static str, param: Option<Value>) -> &mut Self {
        if let Some(param) = param {
            self.condition(fragment, param);
        }
        self
    }

    fn tail(&mut self, tail: &str, params: impl IntoIterator<Item = Value>) -> &mut Self {
        self.tail.push(' ');
        self.tail.push_str(tail);
        self.params.extend(params);
        self
    }

    fn finish(self) -> BuiltQuery {
        let mut sql = self.head;
        sql.push_str(" WHERE ");
        sql.push_str(&self.conditions.join(" AND "));
        sql.push_str(&self.tail);
        BuiltQuery {
            sql,
            params: self.params,
        }
    }
}

fn timestamp_param(value: RecordTimestamp) -> Result<Value, WarehouseError> {
    Ok(Value::Text(value.to_sql_text()?))
}

/// Records of one asset matching every present criterion.
///
/// `end_date` is widened to the whole day: the bound becomes
/// `timestamp < end_date + 1 day`. Rows come back in ascending time order.
pub fn filtered(asset_id: &str, criteria: &FilterCriteria) -> Result<BuiltQuery, WarehouseError> {
    let start = criteria
        .start_date
        .map(|date| timestamp_param(RecordTimestamp::start_of_day(date)))
        .transpose()?;
    // Date::MAX has no successor; every timestamp on or before it qualifies.
    let end = criteria
        .end_date
        .and_then(Date::next_day)
        .map(|next| timestamp_param(RecordTimestamp::start_of_day(next)))
        .transpose()?;

    let mut builder = QueryBuilder::new(RECORD_COLUMNS, asset_id);
    builder
        .optional("timestamp >= CAST(? AS TIMESTAMP)", start)
        .optional("timestamp < CAST(? AS TIMESTAMP)", end)
        .optional("price >= ?", criteria.min_price.map(Value::Double))
        .optional("price <= ?", criteria.max_price.map(Value::Double))
        .optional("volume >= ?", criteria.min_volume.map(Value::Double))
        .optional("volume <= ?", criteria.max_volume.map(Value::Double))
        .tail("ORDER BY timestamp ASC", std::iter::empty());
    Ok(builder.finish())
}

/// One page of an asset's records ordered by ascending timestamp.
///
/// `limit`/`offset` are bound as given; positivity is the caller's contract.
pub fn paginated(asset_id: &str, window: PaginationWindow) -> BuiltQuery {
    let mut builder = QueryBuilder::new(RECORD_COLUMNS, asset_id);
    builder.tail(
        "ORDER BY timestamp ASC LIMIT ? OFFSET ?",
        [Value::BigInt(window.limit), Value::BigInt(window.offset)],
    );
    builder.finish()
}

/// Average price, total volume and matched row count between two dates.
///
/// Both bounds compare against midnight of the given day, with no widening of
/// `end_date`.
pub fn summary(
    asset_id: &str,
    start_date: Date,
    end_date: Date,
) -> Result<BuiltQuery, WarehouseError> {
    let mut builder = QueryBuilder::new(
        "AVG(price) AS avg_price, SUM(volume) AS total_volume, COUNT(*) AS row_count",
        asset_id,
    );
    builder
        .condition(
            "timestamp >= CAST(? AS TIMESTAMP)",
            timestamp_param(RecordTimestamp::start_of_day(start_date))?,
        )
        .condition(
            "timestamp <= CAST(? AS TIMESTAMP)",
            timestamp_param(RecordTimestamp::start_of_day(end_date))?,
        );
    Ok(builder.finish())
}

/// Every distinct asset id in the store.
pub fn distinct_asset_ids() -> BuiltQuery {
    BuiltQuery {
        sql: format!("SELECT DISTINCT coin_id FROM {RECORD_TABLE} ORDER BY coin_id"),
        params: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn unconstrained_filter_only_matches_asset() {
        let query = filtered("bitcoin", &FilterCriteria::default()).expect("query");

        assert_eq!(
            query.sql(),
            "SELECT coin_id, strftime(timestamp, '%Y-%m-%d %H:%M:%S') AS ts, price, volume \
             FROM historical_data WHERE coin_id = ? ORDER BY timestamp ASC"
        );
        assert_eq!(query.params(), &[text("bitcoin")]);
    }

    #[test]
    fn each_present_criterion_adds_one_condition() {
        let criteria = FilterCriteria {
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: Some(date!(2024 - 01 - 02)),
            min_price: Some(100.0),
            max_price: Some(100_000.0),
            min_volume: None,
            max_volume: Some(5_000.0),
        };

        let query = filtered("bitcoin", &criteria).expect("query");

        assert!(query.sql().contains(
            "WHERE coin_id = ? AND timestamp >= CAST(? AS TIMESTAMP) \
             AND timestamp < CAST(? AS TIMESTAMP) AND price >= ? AND price <= ? AND volume <= ?"
        ));
        assert!(!query.sql().contains("volume >= ?"));
        assert_eq!(
            query.params(),
            &[
                text("bitcoin"),
                text("2024-01-01 00:00:00"),
                text("2024-01-03 00:00:00"),
                Value::Double(100.0),
                Value::Double(100_000.0),
                Value::Double(5_000.0),
            ]
        );
    }

    #[test]
    fn end_date_bound_is_exclusive_next_midnight() {
        let criteria = FilterCriteria {
            end_date: Some(date!(2024 - 12 - 31)),
            ..FilterCriteria::default()
        };

        let query = filtered("eth", &criteria).expect("query");

        assert!(query.sql().contains("timestamp < CAST(? AS TIMESTAMP)"));
        assert_eq!(query.params()[1], text("2025-01-01 00:00:00"));
    }

    #[test]
    fn early_year_dates_bind_as_four_digit_text() {
        let criteria = FilterCriteria {
            start_date: Some(date!(0099 - 01 - 01)),
            ..FilterCriteria::default()
        };

        let query = filtered("bitcoin", &criteria).expect("query");

        assert_eq!(query.params()[1], text("0099-01-01 00:00:00"));
    }

    #[test]
    fn hostile_asset_id_stays_a_parameter() {
        let hostile = "btc'; DROP TABLE historical_data; --";
        let query = filtered(hostile, &FilterCriteria::default()).expect("query");

        assert!(!query.sql().contains("DROP"));
        assert_eq!(query.params()[0], text(hostile));
    }

    #[test]
    fn pagination_orders_before_limit_and_offset() {
        let query = paginated("bitcoin", PaginationWindow::new(2, 4));

        assert!(query
            .sql()
            .ends_with("WHERE coin_id = ? ORDER BY timestamp ASC LIMIT ? OFFSET ?"));
        assert_eq!(
            query.params(),
            &[text("bitcoin"), Value::BigInt(2), Value::BigInt(4)]
        );
    }

    #[test]
    fn summary_uses_raw_date_bounds() {
        let query =
            summary("bitcoin", date!(2024 - 01 - 01), date!(2024 - 01 - 04)).expect("query");

        assert!(query.sql().starts_with(
            "SELECT AVG(price) AS avg_price, SUM(volume) AS total_volume, COUNT(*) AS row_count"
        ));
        assert_eq!(
            query.params(),
            &[
                text("bitcoin"),
                text("2024-01-01 00:00:00"),
                text("2024-01-04 00:00:00"),
            ]
        );
    }
}
