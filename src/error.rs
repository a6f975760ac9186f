use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("schema validation failed, missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("no valid rows survived validation")]
    EmptyBatch,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A derivation rule could not produce a value for an otherwise valid row.
/// Records that passed validation should never hit this; it exists so an
/// enricher/validator contract mismatch surfaces as a reported row instead
/// of a panic.
#[derive(Error, Debug)]
#[error("enrichment failed on field {field}: {reason}")]
pub struct FieldEnrichmentError {
    pub field: String,
    pub reason: String,
}

/// Per-row failure collected during validation or enrichment. Rows are
/// dropped and reported, never raised individually, so one upload produces
/// a single consolidated report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowError {
    /// 1-based position of the row within the uploaded batch, matching the
    /// row numbering users see in their spreadsheet.
    pub row_index: usize,
    pub kind: RowErrorKind,
    /// Column label that triggered the failure, when one is identifiable.
    pub field: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RowErrorKind {
    /// A required field is absent or blank.
    MissingField,
    /// A field is present but its value cannot be interpreted.
    MalformedField,
    /// A derived field could not be computed from the validated row.
    FieldEnrichment,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.kind {
            RowErrorKind::MissingField => "missing field",
            RowErrorKind::MalformedField => "malformed field",
            RowErrorKind::FieldEnrichment => "enrichment failed on field",
        };
        match &self.field {
            Some(field) => write!(f, "row {}: {} {}", self.row_index, what, field),
            None => write!(f, "row {}: {}", self.row_index, what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display_names_field() {
        let err = RowError {
            row_index: 2,
            kind: RowErrorKind::MissingField,
            field: Some("年龄".to_string()),
        };
        assert_eq!(err.to_string(), "row 2: missing field 年龄");
    }

    #[test]
    fn test_schema_error_lists_columns() {
        let err = EngineError::Schema {
            missing: vec!["年龄".to_string(), "籍贯".to_string()],
        };
        assert!(err.to_string().contains("年龄, 籍贯"));
    }
}
