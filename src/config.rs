use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result};

/// One row of the institution tier table: a ranked tier label and the marker
/// substrings that map a raw institution-category label onto it. Rows are
/// scanned top to bottom; the first rule with any matching marker wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierRule {
    pub tier: String,
    pub markers: Vec<String>,
}

/// One birth-cohort bucket: every birth year at or above `min_year` that no
/// higher rule claimed falls into `label`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CohortRule {
    pub min_year: i32,
    pub label: String,
}

/// Engine configuration: the tier marker table, cohort boundaries, and the
/// marker strings the aggregator keys off. The values here are an external
/// contract shared with the report template; ship updates through
/// `config.toml` rather than code changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Substring marking an overseas institution-category label.
    pub overseas_marker: String,
    /// Tier assigned when no marker matches.
    pub unclassified_tier: String,
    /// Cohort assigned to birth years below every configured boundary.
    pub fallback_cohort: String,
    /// Sign-up status substring counted as a bilateral agreement.
    pub bilateral_marker: String,
    /// Sign-up status substring counted as a trilateral agreement.
    pub trilateral_marker: String,
    /// Tier whose head-count feeds the alliance remainder in the
    /// key-institution summary.
    pub alliance_tier: String,
    /// Schools subtracted from the alliance remainder (they get their own
    /// lines in the summary).
    pub alliance_excluded: Vec<String>,
    /// Schools reported individually in the key-institution summary, in
    /// narrative order.
    pub key_schools: Vec<String>,
    /// Ranked tier table, highest precedence first.
    pub tiers: Vec<TierRule>,
    /// Cohort boundaries, kept sorted by descending `min_year`.
    pub cohorts: Vec<CohortRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        fn tier(label: &str, markers: &[&str]) -> TierRule {
            TierRule {
                tier: label.to_string(),
                markers: markers.iter().map(|m| m.to_string()).collect(),
            }
        }
        fn cohort(min_year: i32, label: &str) -> CohortRule {
            CohortRule {
                min_year,
                label: label.to_string(),
            }
        }

        Self {
            overseas_marker: "海外院校".to_string(),
            unclassified_tier: "其他".to_string(),
            fallback_cohort: "其他".to_string(),
            bilateral_marker: "两方".to_string(),
            trilateral_marker: "三方".to_string(),
            alliance_tier: "C9联盟".to_string(),
            alliance_excluded: vec!["清华大学".to_string(), "北京大学".to_string()],
            key_schools: vec![
                "清华大学".to_string(),
                "北京大学".to_string(),
                "同济大学".to_string(),
                "中南大学".to_string(),
                "北京交通大学".to_string(),
                "西南交通大学".to_string(),
                "兰州交通大学".to_string(),
                "大连交通大学".to_string(),
                "华东交通大学".to_string(),
            ],
            // The generic overseas rule sits between the QS tiers and the
            // domestic tiers so that an overseas label without a QS marker
            // never falls through to a domestic tier.
            tiers: vec![
                tier("QS1-50", &["QS1-50", "QS前50"]),
                tier("QS100", &["QS100", "QS前100"]),
                tier("其他海外院校", &["海外院校"]),
                tier("C9联盟", &["C9联盟"]),
                tier("985", &["985"]),
                tier("211", &["211"]),
                tier("轨道交通合作院校", &["轨道交通合作院校"]),
                tier("优势学科院校", &["优势学科院校"]),
                tier("湖南省知名高校", &["湖南省知名高校"]),
                tier("创新型大学", &["创新型大学"]),
                tier("其他签字增补院校", &["其他签字增补院校"]),
            ],
            cohorts: vec![
                cohort(2005, "05后"),
                cohort(2000, "00后"),
                cohort(1995, "95后"),
                cohort(1990, "90后"),
            ],
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Fields absent from the file keep
    /// their built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: EngineConfig = toml::from_str(&content)?;
        Ok(config.normalized())
    }

    /// Sort cohort rules by descending boundary year so cohort lookup is a
    /// first-match scan regardless of how the file orders them.
    fn normalized(mut self) -> Self {
        self.cohorts.sort_by(|a, b| b.min_year.cmp(&a.min_year));
        self
    }
}

/// Shared built-in configuration for callers that do not load a file.
pub fn default_config() -> &'static EngineConfig {
    static DEFAULT: Lazy<EngineConfig> = Lazy::new(EngineConfig::default);
    &DEFAULT
}

/// One axis of aggregation in the statistics bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Position,
    Degree,
    InstitutionTier,
    Gender,
    Province,
    BirthCohort,
    SignupStatus,
    PoliticalStatus,
    MajorCategory,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::Position,
        Dimension::Degree,
        Dimension::InstitutionTier,
        Dimension::Gender,
        Dimension::Province,
        Dimension::BirthCohort,
        Dimension::SignupStatus,
        Dimension::PoliticalStatus,
        Dimension::MajorCategory,
    ];

    /// Stable key under which this dimension's table appears in the bundle.
    /// Names follow the dashboard's statistics payload.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Position => "position",
            Dimension::Degree => "education",
            Dimension::InstitutionTier => "institution_category",
            Dimension::Gender => "gender",
            Dimension::Province => "province_distribution",
            Dimension::BirthCohort => "age_distribution",
            Dimension::SignupStatus => "signup_status",
            Dimension::PoliticalStatus => "political_status",
            Dimension::MajorCategory => "major_type",
        }
    }
}

/// Selects which dimensions the aggregator tabulates and carries the marker
/// values its counters key off. Built from an `EngineConfig` so tier or
/// cohort overrides flow through to aggregation.
#[derive(Debug, Clone)]
pub struct DimensionConfig {
    pub dimensions: BTreeSet<Dimension>,
    pub key_schools: Vec<String>,
    pub alliance_tier: String,
    pub alliance_excluded: Vec<String>,
    pub bilateral_marker: String,
    pub trilateral_marker: String,
}

impl DimensionConfig {
    /// All dimensions, with marker values taken from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            dimensions: Dimension::ALL.into_iter().collect(),
            key_schools: config.key_schools.clone(),
            alliance_tier: config.alliance_tier.clone(),
            alliance_excluded: config.alliance_excluded.clone(),
            bilateral_marker: config.bilateral_marker.clone(),
            trilateral_marker: config.trilateral_marker.clone(),
        }
    }

    /// Restrict tabulation to a subset of dimensions.
    pub fn with_dimensions(
        config: &EngineConfig,
        dimensions: impl IntoIterator<Item = Dimension>,
    ) -> Self {
        Self {
            dimensions: dimensions.into_iter().collect(),
            ..Self::from_config(config)
        }
    }
}

impl Default for DimensionConfig {
    fn default() -> Self {
        Self::from_config(default_config())
    }
}
