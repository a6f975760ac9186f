//! Field enrichment: derives the four analytical fields from a validated
//! record. Every derivation is a pure function of that record and the engine
//! configuration, so enrichment is order-free and safe to parallelize.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::columns;
use crate::config::EngineConfig;
use crate::error::FieldEnrichmentError;
use crate::pipeline::classify;
use crate::pipeline::validate::RawRecord;

/// An enriched record: the validated raw record plus its derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    pub enrichment: Enrichment,
}

/// The derived analytical fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enrichment {
    /// Whether the institution-category label carries the overseas marker.
    pub is_overseas_institution: bool,
    /// Ranked tier from the configured marker table, or its fallback.
    pub institution_tier: String,
    /// Province component of the origin field.
    pub origin_province: String,
    /// Birth-year cohort bucket.
    pub birth_cohort: String,
    /// The birth year the cohort was derived from; also feeds the
    /// birth-year series.
    pub birth_year: i32,
}

/// Derive the analytical fields for one record. The only failable derivation
/// is the birth-year extraction, which validation already guarantees, so the
/// error path only fires on a validator/enricher contract mismatch.
pub fn enrich(
    raw: RawRecord,
    config: &EngineConfig,
) -> Result<EnrichedRecord, FieldEnrichmentError> {
    let birth_year =
        extract_birth_year(&raw.birth_date).ok_or_else(|| FieldEnrichmentError {
            field: columns::BIRTH_DATE.to_string(),
            reason: format!("no usable year in {:?}", raw.birth_date),
        })?;

    let enrichment = Enrichment {
        is_overseas_institution: classify::is_overseas(&raw.institution_category, config),
        institution_tier: classify::classify_tier(&raw.institution_category, config).to_string(),
        origin_province: origin_province(&raw.origin).to_string(),
        birth_cohort: classify::birth_cohort(birth_year, config).to_string(),
        birth_year,
    };

    Ok(EnrichedRecord { raw, enrichment })
}

/// Province component of the origin field: everything before the first `-`,
/// or the whole string when no separator exists.
pub fn origin_province(origin: &str) -> &str {
    match origin.split_once('-') {
        Some((province, _)) => province,
        None => origin,
    }
}

static LEADING_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{4})").expect("leading-year pattern is valid"));

/// Pull the birth year out of a date-of-birth cell. Accepts full dates in
/// dash or slash form, and otherwise any cell starting with a four-digit
/// year (spreadsheet exports also hand us timestamps and bare years).
pub fn extract_birth_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return plausible_year(date.year());
        }
    }
    let year = LEADING_YEAR
        .captures(trimmed)?
        .get(1)?
        .as_str()
        .parse::<i32>()
        .ok()?;
    plausible_year(year)
}

fn plausible_year(year: i32) -> Option<i32> {
    (1900..=2099).contains(&year).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    fn test_record() -> RawRecord {
        RawRecord {
            sequence: 1,
            name: "张三".to_string(),
            gender: "男".to_string(),
            age: 25,
            birth_date: "1998-01-01".to_string(),
            political_status: "中共党员".to_string(),
            origin: "湖南-长沙".to_string(),
            signup_status: "已签约两方协议".to_string(),
            position: "软件工程师".to_string(),
            degree: "本科".to_string(),
            major: "计算机科学".to_string(),
            major_category: "工科".to_string(),
            institution: "清华大学".to_string(),
            institution_category: "C9联盟".to_string(),
        }
    }

    #[test]
    fn test_enrich_derives_all_fields() {
        let record = enrich(test_record(), default_config()).unwrap();
        assert!(!record.enrichment.is_overseas_institution);
        assert_eq!(record.enrichment.institution_tier, "C9联盟");
        assert_eq!(record.enrichment.origin_province, "湖南");
        assert_eq!(record.enrichment.birth_cohort, "95后");
        assert_eq!(record.enrichment.birth_year, 1998);
    }

    #[test]
    fn test_enrich_is_deterministic() {
        let config = default_config();
        let first = enrich(test_record(), config).unwrap();
        let second = enrich(test_record(), config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overseas_record() {
        let mut raw = test_record();
        raw.institution = "帝国理工学院".to_string();
        raw.institution_category = "海外院校,QS1-50".to_string();
        let record = enrich(raw, default_config()).unwrap();
        assert!(record.enrichment.is_overseas_institution);
        assert_eq!(record.enrichment.institution_tier, "QS1-50");
    }

    #[test]
    fn test_origin_without_separator_is_kept_whole() {
        assert_eq!(origin_province("湖南长沙"), "湖南长沙");
        assert_eq!(origin_province("北京"), "北京");
    }

    #[test]
    fn test_origin_splits_on_first_separator() {
        assert_eq!(origin_province("湖南-长沙"), "湖南");
        assert_eq!(origin_province("内蒙古-呼和浩特-回民区"), "内蒙古");
    }

    #[test]
    fn test_cohort_boundary_dates() {
        let config = default_config();
        let cohort_of = |birth_date: &str| {
            let mut raw = test_record();
            raw.birth_date = birth_date.to_string();
            enrich(raw, config).unwrap().enrichment.birth_cohort
        };
        assert_eq!(cohort_of("2000-01-01"), "00后");
        assert_eq!(cohort_of("1994-12-31"), "90后");
        assert_eq!(cohort_of("1989-01-01"), "其他");
        assert_eq!(cohort_of("2005-06-01"), "05后");
    }

    #[test]
    fn test_birth_year_formats() {
        assert_eq!(extract_birth_year("1998-01-01"), Some(1998));
        assert_eq!(extract_birth_year("1998/5/15"), Some(1998));
        assert_eq!(extract_birth_year("1998-01-01 00:00:00"), Some(1998));
        assert_eq!(extract_birth_year(" 2001年3月 "), Some(2001));
        assert_eq!(extract_birth_year("2001"), Some(2001));
        assert_eq!(extract_birth_year("生于戊寅年"), None);
        assert_eq!(extract_birth_year(""), None);
        assert_eq!(extract_birth_year("0001-01-01"), None);
    }

    #[test]
    fn test_enrich_fails_on_unusable_birth_date() {
        // Defensive path: validation normally rejects such rows first.
        let mut raw = test_record();
        raw.birth_date = "未知".to_string();
        let err = enrich(raw, default_config()).unwrap_err();
        assert_eq!(err.field, "出生日期");
    }
}
