#![allow(clippy::unwrap_used, clippy::expect_used)]

use assertx_core::comparator::DEFAULT_MAX_DEPTH;
use assertx_core::errors::{ExError, ExErrorKind};
use assertx_core::logging_facility::Profile;
use assertx_core::{EngineConfig, Value};

const FULL: &str = r#"
[equality]
tolerance = 0.01
max_depth = 4
canonicalize = true
ignore_case = true

[logging]
profile = "production"
"#;

#[test]
fn test_full_document() {
    let config = EngineConfig::from_toml_str(FULL).unwrap();

    assert_eq!(config.equality.tolerance, 0.01);
    assert_eq!(config.equality.max_depth, 4);
    assert!(config.equality.canonicalize);
    assert!(config.equality.ignore_case);
    assert_eq!(config.logging.profile, Profile::Production);
}

#[test]
fn test_comparator_uses_configured_options() {
    let config = EngineConfig::from_toml_str(FULL).unwrap();
    let comparator = config.comparator();

    let expected = Value::list([Value::from("A"), Value::Float(1.0)]);
    let actual = Value::list([Value::Float(1.005), Value::from("a")]);
    assert!(comparator.equals(&expected, &actual));

    let strict = EngineConfig::default().comparator();
    assert!(!strict.equals(&expected, &actual));
}

#[test]
fn test_defaults() {
    let config = EngineConfig::from_toml_str("[logging]\n").unwrap();
    assert_eq!(config.equality.tolerance, 0.0);
    assert_eq!(config.equality.max_depth, DEFAULT_MAX_DEPTH);
    assert!(!config.equality.canonicalize);
}

#[test]
fn test_unknown_section_rejected() {
    let err = EngineConfig::from_toml_str("[reporting]\ncolor = true\n").unwrap_err();
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::Config);
}

#[test]
fn test_misspelled_equality_key_rejected() {
    let err = EngineConfig::from_toml_str("[equality]\ntolernace = 0.5\n").unwrap_err();
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Config);
}

#[test]
fn test_misspelled_logging_key_rejected() {
    let err = EngineConfig::from_toml_str("[logging]\nprofle = \"production\"\n").unwrap_err();
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Config);
}

#[test]
fn test_nan_tolerance_rejected() {
    let err = EngineConfig::from_toml_str("[equality]\ntolerance = nan\n").unwrap_err();
    assert!(err.to_string().contains("equality"));
}
