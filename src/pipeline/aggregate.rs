//! Streaming aggregation: one pass over the enriched batch accumulates every
//! dimension table, the position × degree cross-tabulation, the birth-year
//! series, the signing split, and the key-institution counts. The fold is
//! commutative, so row order never shows up in the bundle.

use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{Dimension, DimensionConfig};
use crate::fingerprint;
use crate::pipeline::bundle::{
    build_narrative, CategoryCount, KeyInstitutionSummary, PairCount, StatisticsBundle, YearCount,
};
use crate::pipeline::enrich::EnrichedRecord;

/// Fold an enriched batch into its statistics bundle. An empty batch yields
/// an all-zero bundle, never an error; consumers are expected to handle the
/// zero case themselves.
pub fn aggregate(records: &[EnrichedRecord], dimensions: &DimensionConfig) -> StatisticsBundle {
    let total = records.len() as u64;

    let mut tables: BTreeMap<&'static str, BTreeMap<String, u64>> = dimensions
        .dimensions
        .iter()
        .map(|dimension| (dimension.key(), BTreeMap::new()))
        .collect();
    let mut cross: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut years: BTreeMap<i32, u64> = BTreeMap::new();
    let mut school_counts: BTreeMap<String, u64> = dimensions
        .key_schools
        .iter()
        .map(|school| (school.clone(), 0))
        .collect();
    let mut bilateral = 0u64;
    let mut trilateral = 0u64;
    let mut alliance_total = 0u64;

    for record in records {
        for dimension in &dimensions.dimensions {
            let value = dimension_value(*dimension, record);
            if let Some(table) = tables.get_mut(dimension.key()) {
                *table.entry(value.to_string()).or_insert(0) += 1;
            }
        }

        *cross
            .entry((record.raw.position.clone(), record.raw.degree.clone()))
            .or_insert(0) += 1;
        *years.entry(record.enrichment.birth_year).or_insert(0) += 1;

        if record.raw.signup_status.contains(&dimensions.bilateral_marker) {
            bilateral += 1;
        }
        if record.raw.signup_status.contains(&dimensions.trilateral_marker) {
            trilateral += 1;
        }

        if let Some(count) = school_counts.get_mut(&record.raw.institution) {
            *count += 1;
        }
        if record.enrichment.institution_tier == dimensions.alliance_tier {
            alliance_total += 1;
        }
    }

    // Alliance remainder: the alliance tier head-count minus the schools
    // reported on their own lines, floored at zero.
    let excluded_sum: u64 = dimensions
        .alliance_excluded
        .iter()
        .filter_map(|school| school_counts.get(school))
        .sum();
    school_counts.insert(
        dimensions.alliance_tier.clone(),
        alliance_total.saturating_sub(excluded_sum),
    );

    let narrative = build_narrative(
        &school_counts,
        &dimensions.key_schools,
        &dimensions.alliance_tier,
        &dimensions.alliance_excluded,
    );

    let bundle = StatisticsBundle {
        batch_fingerprint: fingerprint::batch_fingerprint(records),
        total_valid_records: total,
        bilateral_count: bilateral,
        trilateral_count: trilateral,
        dimensions: tables
            .into_iter()
            .map(|(key, counts)| (key.to_string(), into_table(counts, total)))
            .collect(),
        position_degree: cross
            .into_iter()
            .map(|((position, degree), count)| PairCount {
                position,
                degree,
                count,
            })
            .collect(),
        birth_year_series: years
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        key_institutions: KeyInstitutionSummary {
            counts: school_counts,
            narrative,
        },
    };

    debug!(
        total_records = bundle.total_valid_records,
        dimensions = bundle.dimensions.len(),
        "aggregated batch"
    );
    bundle
}

/// The category a record contributes to a given dimension.
fn dimension_value(dimension: Dimension, record: &EnrichedRecord) -> &str {
    match dimension {
        Dimension::Position => &record.raw.position,
        Dimension::Degree => &record.raw.degree,
        Dimension::InstitutionTier => &record.enrichment.institution_tier,
        Dimension::Gender => &record.raw.gender,
        Dimension::Province => &record.enrichment.origin_province,
        Dimension::BirthCohort => &record.enrichment.birth_cohort,
        Dimension::SignupStatus => &record.raw.signup_status,
        Dimension::PoliticalStatus => &record.raw.political_status,
        Dimension::MajorCategory => &record.raw.major_category,
    }
}

/// Turn a frequency map into the bundle's table form: count descending, ties
/// broken by lexical label order. The map iterates in label order, so the
/// stable sort preserves it within equal counts.
fn into_table(counts: BTreeMap<String, u64>, total: u64) -> Vec<CategoryCount> {
    let mut table: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count));
    table
}

/// Share of the valid batch, rounded to one decimal. A zero total reports
/// 0.0 instead of dividing.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}
