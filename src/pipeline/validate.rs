//! Schema validation: batch-level required-column check, then all-or-nothing
//! per-row typing of the 14 contract fields. Rows that fail are dropped and
//! reported; the batch only fails as a whole when a required column is absent
//! everywhere or no row survives.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::columns;
use crate::error::{EngineError, Result, RowError, RowErrorKind};
use crate::pipeline::enrich;

/// A raw sign-up record with every contract field present, trimmed and typed.
/// Immutable once validated; enrichment only ever adds to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRecord {
    pub sequence: u64,
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub birth_date: String,
    pub political_status: String,
    pub origin: String,
    pub signup_status: String,
    pub position: String,
    pub degree: String,
    pub major: String,
    pub major_category: String,
    pub institution: String,
    pub institution_category: String,
}

/// Validate a batch of raw rows. Returns the surviving records paired with
/// their 1-based row index, plus one `RowError` per dropped row.
///
/// Fatal failures: a required column missing from every row (`Schema`), or
/// zero rows surviving (`EmptyBatch`).
pub fn validate_batch(rows: &[Value]) -> Result<(Vec<(usize, RawRecord)>, Vec<RowError>)> {
    if rows.is_empty() {
        return Err(EngineError::EmptyBatch);
    }
    check_columns(rows)?;

    let mut validated = Vec::with_capacity(rows.len());
    let mut row_errors = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        let row_index = position + 1;
        match validate_row(row_index, row) {
            Ok(record) => validated.push((row_index, record)),
            Err(row_error) => {
                debug!(%row_error, "dropping row");
                row_errors.push(row_error);
            }
        }
    }

    if validated.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    Ok((validated, row_errors))
}

/// Batch-level column check: a required column absent from every row is
/// fatal; unknown columns are ignored with a warning.
fn check_columns(rows: &[Value]) -> Result<()> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        if let Value::Object(map) = row {
            seen.extend(map.keys().map(String::as_str));
        }
    }

    let missing: Vec<String> = columns::REQUIRED_COLUMNS
        .iter()
        .filter(|column| !seen.contains(**column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::Schema { missing });
    }

    for column in seen {
        if !columns::is_required_column(column) {
            warn!(column, "ignoring unknown column");
        }
    }
    Ok(())
}

fn validate_row(row_index: usize, row: &Value) -> std::result::Result<RawRecord, RowError> {
    let map = match row {
        Value::Object(map) => map,
        _ => {
            return Err(RowError {
                row_index,
                kind: RowErrorKind::MalformedField,
                field: None,
            })
        }
    };

    let field_error = |kind: RowErrorKind, column: &str| RowError {
        row_index,
        kind,
        field: Some(column.to_string()),
    };

    let string_field = |column: &str| {
        string_cell(map, column).map_err(|kind| field_error(kind, column))
    };
    let integer_field = |column: &str| {
        integer_cell(map, column).map_err(|kind| field_error(kind, column))
    };

    let birth_date = string_field(columns::BIRTH_DATE)?;
    if enrich::extract_birth_year(&birth_date).is_none() {
        return Err(field_error(RowErrorKind::MalformedField, columns::BIRTH_DATE));
    }

    let age = integer_field(columns::AGE)?;
    let age = u32::try_from(age)
        .map_err(|_| field_error(RowErrorKind::MalformedField, columns::AGE))?;

    Ok(RawRecord {
        sequence: integer_field(columns::SEQUENCE)?,
        name: string_field(columns::NAME)?,
        gender: string_field(columns::GENDER)?,
        age,
        birth_date,
        political_status: string_field(columns::POLITICAL_STATUS)?,
        origin: string_field(columns::ORIGIN)?,
        signup_status: string_field(columns::SIGNUP_STATUS)?,
        position: string_field(columns::POSITION)?,
        degree: string_field(columns::DEGREE)?,
        major: string_field(columns::MAJOR)?,
        major_category: string_field(columns::MAJOR_CATEGORY)?,
        institution: string_field(columns::INSTITUTION)?,
        institution_category: string_field(columns::INSTITUTION_CATEGORY)?,
    })
}

/// A required text cell: present, non-blank. Numeric cells are accepted and
/// rendered, since spreadsheet exports type some label columns as numbers.
fn string_cell(row: &Map<String, Value>, column: &str) -> std::result::Result<String, RowErrorKind> {
    match row.get(column) {
        None | Some(Value::Null) => Err(RowErrorKind::MissingField),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(RowErrorKind::MissingField)
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(RowErrorKind::MalformedField),
    }
}

/// A required integer cell: a JSON integer, a whole-valued float (pandas
/// exports integers as `25.0`), or a numeric string.
fn integer_cell(row: &Map<String, Value>, column: &str) -> std::result::Result<u64, RowErrorKind> {
    match row.get(column) {
        None | Some(Value::Null) => Err(RowErrorKind::MissingField),
        Some(Value::Number(n)) => number_as_u64(n).ok_or(RowErrorKind::MalformedField),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(RowErrorKind::MissingField);
            }
            parse_u64(trimmed).ok_or(RowErrorKind::MalformedField)
        }
        Some(_) => Err(RowErrorKind::MalformedField),
    }
}

fn number_as_u64(n: &serde_json::Number) -> Option<u64> {
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn parse_u64(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}
