//! The statistics bundle: the immutable snapshot a processed batch produces.
//! Created fresh per batch, never mutated afterwards, safe to share
//! read-only across consumers (dashboard handlers, report generator).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One category row of a dimension table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
    /// Share of the valid batch, rounded to one decimal; 0.0 for an empty
    /// batch rather than NaN.
    pub percentage: f64,
}

/// One cell of the position × degree cross-tabulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairCount {
    pub position: String,
    pub degree: String,
    pub count: u64,
}

/// One point of the birth-year series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

/// Head-counts for the key schools plus the narrative sentence the report
/// embeds under 重点院校统计.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyInstitutionSummary {
    /// Exact-name head-count per key school, plus the alliance remainder
    /// under the alliance tier's own label.
    pub counts: BTreeMap<String, u64>,
    pub narrative: String,
}

/// Aggregated statistics for one processed batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatisticsBundle {
    /// Order-invariant content identity of the enriched batch.
    pub batch_fingerprint: String,
    pub total_valid_records: u64,
    /// Records whose sign-up status marks a bilateral agreement.
    pub bilateral_count: u64,
    /// Records whose sign-up status marks a trilateral agreement.
    pub trilateral_count: u64,
    /// Frequency table per tabulated dimension, sorted by count descending
    /// with ties broken by lexical label order.
    pub dimensions: BTreeMap<String, Vec<CategoryCount>>,
    /// Position × degree cross-tabulation, lexical by pair.
    pub position_degree: Vec<PairCount>,
    /// Chart-ready birth-year counts in ascending year order.
    pub birth_year_series: Vec<YearCount>,
    pub key_institutions: KeyInstitutionSummary,
}

/// Sentence used when no key school shows up in the batch.
pub const EMPTY_NARRATIVE: &str = "暂无重点院校引进数据。";

/// Build the key-institution narrative: excluded alliance schools first in
/// configured order, then the alliance remainder, then the other key
/// schools, skipping zero counts throughout.
pub fn build_narrative(
    counts: &BTreeMap<String, u64>,
    key_schools: &[String],
    alliance_tier: &str,
    alliance_excluded: &[String],
) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut mention = |label: &str, count: u64| {
        if count > 0 {
            parts.push(format!("{label}{count}人"));
        }
    };

    for school in key_schools.iter().filter(|s| alliance_excluded.contains(*s)) {
        mention(school, counts.get(school).copied().unwrap_or(0));
    }
    let alliance_count = counts.get(alliance_tier).copied().unwrap_or(0);
    mention(
        &format!("{alliance_tier}（除{}外）", alliance_excluded.join("、")),
        alliance_count,
    );
    for school in key_schools.iter().filter(|s| !alliance_excluded.contains(*s)) {
        mention(school, counts.get(school).copied().unwrap_or(0));
    }

    if parts.is_empty() {
        return EMPTY_NARRATIVE.to_string();
    }
    format!("引进重点院校人员情况如下：{}。", parts.join("、"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_counts(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    fn key_schools() -> Vec<String> {
        ["清华大学", "北京大学", "同济大学", "中南大学"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn excluded() -> Vec<String> {
        vec!["清华大学".to_string(), "北京大学".to_string()]
    }

    #[test]
    fn test_narrative_orders_and_skips_zeros() {
        let counts = summary_counts(&[
            ("清华大学", 2),
            ("北京大学", 0),
            ("C9联盟", 3),
            ("同济大学", 1),
            ("中南大学", 0),
        ]);
        let narrative = build_narrative(&counts, &key_schools(), "C9联盟", &excluded());
        assert_eq!(
            narrative,
            "引进重点院校人员情况如下：清华大学2人、C9联盟（除清华大学、北京大学外）3人、同济大学1人。"
        );
    }

    #[test]
    fn test_narrative_empty_batch_placeholder() {
        let counts = summary_counts(&[("清华大学", 0), ("C9联盟", 0)]);
        let narrative = build_narrative(&counts, &key_schools(), "C9联盟", &excluded());
        assert_eq!(narrative, EMPTY_NARRATIVE);
    }

    #[test]
    fn test_narrative_ends_with_full_stop() {
        let counts = summary_counts(&[("中南大学", 5)]);
        let narrative = build_narrative(&counts, &key_schools(), "C9联盟", &excluded());
        assert!(narrative.ends_with('。'));
    }
}
