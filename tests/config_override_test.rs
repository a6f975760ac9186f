use anyhow::Result;
use std::fs;

use recruit_stats::config::EngineConfig;
use recruit_stats::pipeline::classify::{birth_cohort, classify_tier};

#[test]
fn test_toml_override_changes_classification() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("engine.toml");
    fs::write(
        &path,
        r#"
unclassified_tier = "未分类"

[[tiers]]
tier = "双一流"
markers = ["双一流"]

[[cohorts]]
min_year = 1990
label = "90后"

[[cohorts]]
min_year = 2000
label = "00后"
"#,
    )?;

    let config = EngineConfig::load(&path)?;

    // The file's table fully replaces the built-in one.
    assert_eq!(classify_tier("双一流建设高校", &config), "双一流");
    assert_eq!(classify_tier("985工程", &config), "未分类");

    // Cohorts are re-sorted on load, so file order does not matter.
    assert_eq!(birth_cohort(2003, &config), "00后");
    assert_eq!(birth_cohort(1992, &config), "90后");

    // Fields absent from the file keep their defaults.
    assert_eq!(config.overseas_marker, "海外院校");
    assert_eq!(config.bilateral_marker, "两方");

    Ok(())
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_shipped_config_matches_builtin_defaults() -> Result<()> {
    // config.toml at the repo root is the versioned copy of the built-in
    // tables; they must not drift apart.
    let shipped = EngineConfig::load(std::path::Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/config.toml"
    )))?;
    assert_eq!(shipped, EngineConfig::default());
    Ok(())
}
