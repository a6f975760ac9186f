// Record processing pipeline: validation, enrichment, aggregation.

pub mod aggregate;
pub mod bundle;
pub mod classify;
pub mod enrich;
pub mod validate;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::{DimensionConfig, EngineConfig};
use crate::error::{EngineError, Result, RowError, RowErrorKind};

pub use bundle::StatisticsBundle;
pub use enrich::{EnrichedRecord, Enrichment};
pub use validate::RawRecord;

/// Everything one processed upload produces: the surviving enriched batch,
/// the per-row rejection report, and the aggregated statistics.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub records: Vec<EnrichedRecord>,
    pub row_errors: Vec<RowError>,
    pub bundle: StatisticsBundle,
}

/// Validate a batch of raw rows and enrich the survivors. Per-row failures
/// from either stage come back in one consolidated report; batch-level
/// failures (missing columns, nothing surviving) abort with an error.
pub fn validate_and_enrich(
    rows: &[Value],
    config: &EngineConfig,
) -> Result<(Vec<EnrichedRecord>, Vec<RowError>)> {
    let (validated, mut row_errors) = validate::validate_batch(rows)?;

    let mut enriched = Vec::with_capacity(validated.len());
    for (row_index, record) in validated {
        match enrich::enrich(record, config) {
            Ok(record) => enriched.push(record),
            Err(err) => {
                // Validator/enricher contract mismatch; should not happen
                // for rows that passed validation.
                warn!(row_index, field = %err.field, "dropping row after enrichment failure");
                row_errors.push(RowError {
                    row_index,
                    kind: RowErrorKind::FieldEnrichment,
                    field: Some(err.field),
                });
            }
        }
    }

    if enriched.is_empty() {
        return Err(EngineError::EmptyBatch);
    }

    info!(
        valid = enriched.len(),
        rejected = row_errors.len(),
        "batch validated and enriched"
    );
    Ok((enriched, row_errors))
}

/// Full engine run: validate, enrich, then aggregate with the default
/// dimension set derived from `config`.
pub fn process(rows: &[Value], config: &EngineConfig) -> Result<BatchOutcome> {
    let (records, row_errors) = validate_and_enrich(rows, config)?;
    let bundle = aggregate::aggregate(&records, &DimensionConfig::from_config(config));
    Ok(BatchOutcome {
        records,
        row_errors,
        bundle,
    })
}
