//! Institution tier classification: an ordered first-match scan over the
//! configured marker table. Precedence comes from table order, never from
//! where a marker happens to sit inside the label.

use crate::config::EngineConfig;

/// Return the highest-precedence tier whose marker substring appears in the
/// institution-category label, or the configured fallback when none match.
/// Total: never fails.
pub fn classify_tier<'a>(label: &str, config: &'a EngineConfig) -> &'a str {
    for rule in &config.tiers {
        if rule.markers.iter().any(|marker| label.contains(marker.as_str())) {
            return &rule.tier;
        }
    }
    &config.unclassified_tier
}

/// Whether the institution-category label carries the overseas marker.
pub fn is_overseas(label: &str, config: &EngineConfig) -> bool {
    label.contains(&config.overseas_marker)
}

/// Bucket a birth year into its cohort. Rules are sorted by descending
/// boundary year, so the first rule at or below the year wins; years below
/// every boundary land in the fallback cohort.
pub fn birth_cohort<'a>(year: i32, config: &'a EngineConfig) -> &'a str {
    for rule in &config.cohorts {
        if year >= rule.min_year {
            return &rule.label;
        }
    }
    &config.fallback_cohort
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    #[test]
    fn test_single_marker_labels() {
        let config = default_config();
        assert_eq!(classify_tier("C9联盟", config), "C9联盟");
        assert_eq!(classify_tier("985工程", config), "985");
        assert_eq!(classify_tier("211工程院校", config), "211");
        assert_eq!(classify_tier("QS前50", config), "QS1-50");
    }

    #[test]
    fn test_precedence_beats_substring_position() {
        let config = default_config();
        // 985 outranks 211 no matter which marker appears first in the label.
        assert_eq!(classify_tier("211工程,985工程", config), "985");
        assert_eq!(classify_tier("985工程,211工程", config), "985");
    }

    #[test]
    fn test_overseas_labels() {
        let config = default_config();
        assert_eq!(classify_tier("海外院校,QS1-50", config), "QS1-50");
        assert_eq!(classify_tier("海外院校,QS100", config), "QS100");
        assert_eq!(classify_tier("海外院校", config), "其他海外院校");
        assert!(is_overseas("海外院校,QS100", config));
        assert!(!is_overseas("985工程", config));
    }

    #[test]
    fn test_unmatched_label_falls_back() {
        let config = default_config();
        assert_eq!(classify_tier("未知类型", config), "其他");
        assert_eq!(classify_tier("", config), "其他");
    }

    #[test]
    fn test_cohort_boundaries() {
        let config = default_config();
        assert_eq!(birth_cohort(2006, config), "05后");
        assert_eq!(birth_cohort(2005, config), "05后");
        assert_eq!(birth_cohort(2000, config), "00后");
        assert_eq!(birth_cohort(1999, config), "95后");
        assert_eq!(birth_cohort(1995, config), "95后");
        assert_eq!(birth_cohort(1994, config), "90后");
        assert_eq!(birth_cohort(1990, config), "90后");
        assert_eq!(birth_cohort(1989, config), "其他");
    }
}
