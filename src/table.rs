use crate::error::{DashboardError, Result};
use crate::types::RawRepository;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;

/// One normalised repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRow {
    pub name: String,
    pub stargazers_count: u64,
    pub language: Option<String>,
    /// Keeps the offset the timestamp was written with.
    pub created_at: DateTime<FixedOffset>,
}

impl RepositoryRow {
    /// Calendar year of `created_at` in its own offset.
    pub fn year(&self) -> i32 {
        self.created_at.year()
    }
}

impl Serialize for RepositoryRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("RepositoryRow", 5)?;
        row.serialize_field("name", &self.name)?;
        row.serialize_field("stargazers_count", &self.stargazers_count)?;
        row.serialize_field("language", &self.language)?;
        row.serialize_field("created_at", &self.created_at)?;
        row.serialize_field("year", &self.year())?;
        row.end()
    }
}

/// Rows in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RepositoryTable {
    rows: Vec<RepositoryRow>,
}

impl RepositoryTable {
    pub fn rows(&self) -> &[RepositoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositoryRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a RepositoryTable {
    type Item = &'a RepositoryRow;
    type IntoIter = std::slice::Iter<'a, RepositoryRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Project raw records onto the row schema, failing on the first record that
/// cannot be coerced.
pub fn build_table(records: &[RawRepository]) -> Result<RepositoryTable> {
    let rows = records
        .iter()
        .enumerate()
        .map(|(index, record)| build_row(index, record))
        .collect::<Result<Vec<_>>>()?;

    Ok(RepositoryTable { rows })
}

fn build_row(row: usize, record: &RawRepository) -> Result<RepositoryRow> {
    if !record.is_object() {
        return Err(schema(row, "record", "expected a JSON object"));
    }

    Ok(RepositoryRow {
        name: coerce_name(row, record.field("name"))?,
        stargazers_count: coerce_stars(row, record.field("stargazers_count"))?,
        language: coerce_language(row, record.field("language"))?,
        created_at: coerce_created_at(row, record.field("created_at"))?,
    })
}

fn schema(row: usize, field: &'static str, message: impl Into<String>) -> DashboardError {
    DashboardError::SchemaError {
        row,
        field,
        message: message.into(),
    }
}

fn coerce_name(row: usize, value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(schema(row, "name", format!("expected a string, got {}", other))),
        None => Err(schema(row, "name", "missing")),
    }
}

fn coerce_stars(row: usize, value: Option<&Value>) -> Result<u64> {
    const FIELD: &str = "stargazers_count";

    match value {
        Some(Value::Number(n)) => {
            if let Some(count) = n.as_u64() {
                return Ok(count);
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
                _ => Err(schema(row, FIELD, format!("not a non-negative integer: {}", n))),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| schema(row, FIELD, format!("not a non-negative integer: {:?}", s))),
        Some(Value::Null) | None => Err(schema(row, FIELD, "missing")),
        Some(other) => Err(schema(row, FIELD, format!("expected a number, got {}", other))),
    }
}

fn coerce_language(row: usize, value: Option<&Value>) -> Result<Option<String>> {
    match value {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(schema(
            row,
            "language",
            format!("expected a string or null, got {}", other),
        )),
    }
}

fn coerce_created_at(row: usize, value: Option<&Value>) -> Result<DateTime<FixedOffset>> {
    match value {
        Some(Value::String(s)) => parse_timestamp(s).map_err(|message| DashboardError::ParseError {
            row,
            value: s.clone(),
            message,
        }),
        Some(Value::Null) | None => Err(schema(row, "created_at", "missing")),
        Some(other) => Err(schema(
            row,
            "created_at",
            format!("expected a timestamp string, got {}", other),
        )),
    }
}

/// RFC 3339 first, then the offset-less forms, read as UTC.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    let rfc3339_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => return Ok(ts),
        Err(e) => e,
    };

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(rfc3339_err.to_string())
}
