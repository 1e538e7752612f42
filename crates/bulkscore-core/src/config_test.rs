use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.api_base_url, "https://api.madkudu.com/v1/");
    assert_eq!(cfg.results_dir.to_str(), Some("results"));
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.request_timeout_secs.is_none());
    assert_eq!(cfg.user_agent, "bulkscore/0.1 (customer-fit)");
    assert_eq!(cfg.progress_interval, 100);
    assert_eq!(cfg.reference_column, "A");
}

#[test]
fn api_base_url_override() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_API_BASE_URL", "http://localhost:9999/v1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "http://localhost:9999/v1");
}

#[test]
fn results_dir_override() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_RESULTS_DIR", "/tmp/scores");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.results_dir.to_str(), Some("/tmp/scores"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_REQUEST_TIMEOUT_SECS", "45");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, Some(45));
}

#[test]
fn request_timeout_secs_blank_means_no_timeout() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_REQUEST_TIMEOUT_SECS", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.request_timeout_secs.is_none());
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BULKSCORE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(BULKSCORE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn progress_interval_override() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_PROGRESS_INTERVAL", "25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.progress_interval, 25);
}

#[test]
fn progress_interval_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_PROGRESS_INTERVAL", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BULKSCORE_PROGRESS_INTERVAL"),
        "expected InvalidEnvVar(BULKSCORE_PROGRESS_INTERVAL), got: {result:?}"
    );
}

#[test]
fn reference_column_override() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_REFERENCE_COLUMN", "C");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.reference_column, "C");
}

#[test]
fn reference_column_must_be_letters() {
    let mut map = HashMap::new();
    map.insert("BULKSCORE_REFERENCE_COLUMN", "A1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BULKSCORE_REFERENCE_COLUMN"),
        "expected InvalidEnvVar(BULKSCORE_REFERENCE_COLUMN), got: {result:?}"
    );
}
