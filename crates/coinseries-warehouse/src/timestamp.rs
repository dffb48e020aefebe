use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::WarehouseError;

const ISO_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const SQL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Observation time of a record, truncated to whole seconds.
///
/// Stored as a naive `TIMESTAMP`; the record table carries no zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordTimestamp(PrimitiveDateTime);

impl RecordTimestamp {
    pub fn new(value: PrimitiveDateTime) -> Self {
        Self(value.replace_nanosecond(0).unwrap_or(value))
    }

    /// `00:00:00` on the given day.
    pub fn start_of_day(date: Date) -> Self {
        Self(date.midnight())
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS` or the SQL form `YYYY-MM-DD HH:MM:SS`.
    pub fn parse(input: &str) -> Result<Self, WarehouseError> {
        let trimmed = input.trim();
        PrimitiveDateTime::parse(trimmed, ISO_FORMAT)
            .or_else(|_| PrimitiveDateTime::parse(trimmed, SQL_FORMAT))
            .map(Self)
            .map_err(|_| WarehouseError::InvalidData(format!("unparseable timestamp '{input}'")))
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    pub fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }

    /// Text form bound into `CAST(? AS TIMESTAMP)`.
    pub fn to_sql_text(self) -> Result<String, WarehouseError> {
        Ok(self.0.format(SQL_FORMAT)?)
    }
}

impl From<PrimitiveDateTime> for RecordTimestamp {
    fn from(value: PrimitiveDateTime) -> Self {
        Self::new(value)
    }
}

impl Display for RecordTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self.0.format(ISO_FORMAT).map_err(|_| std::fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl Serialize for RecordTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Month;

    #[test]
    fn parses_iso_and_sql_forms() {
        let iso = RecordTimestamp::parse("2024-01-02T23:59:59").expect("iso form");
        let sql = RecordTimestamp::parse("2024-01-02 23:59:59").expect("sql form");
        assert_eq!(iso, sql);
        assert_eq!(iso.to_string(), "2024-01-02T23:59:59");
        assert_eq!(sql.to_sql_text().expect("sql text"), "2024-01-02 23:59:59");
    }

    #[test]
    fn truncates_sub_second_precision() {
        let ts = RecordTimestamp::new(datetime!(2024-01-01 10:00:00.750));
        assert_eq!(ts.into_inner(), datetime!(2024-01-01 10:00:00));
    }

    #[test]
    fn start_of_day_is_midnight() {
        let ts = RecordTimestamp::start_of_day(date!(2024 - 01 - 04));
        assert_eq!(ts.to_sql_text().expect("sql text"), "2024-01-04 00:00:00");
    }

    #[test]
    fn display_output_parses_back() {
        let before_year_one = Date::from_calendar_date(-1, Month::January, 1).expect("date");
        for day in [date!(2024 - 02 - 29), date!(0001 - 01 - 01), before_year_one] {
            let ts = RecordTimestamp::start_of_day(day);

            let iso = RecordTimestamp::parse(&ts.to_string()).expect("iso round trip");
            let sql = RecordTimestamp::parse(&ts.to_sql_text().expect("sql text"))
                .expect("sql round trip");

            assert_eq!(iso, ts);
            assert_eq!(sql, ts);
        }
    }

    #[test]
    fn early_years_keep_four_digits() {
        let ts = RecordTimestamp::start_of_day(date!(0099 - 12 - 31));
        assert_eq!(ts.to_string(), "0099-12-31T00:00:00");
    }

    #[test]
    fn rejects_garbage() {
        let err = RecordTimestamp::parse("yesterday").expect_err("must fail");
        assert!(matches!(err, WarehouseError::InvalidData(_)));
    }
}
