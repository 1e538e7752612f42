use super::*;

fn test_client(base_url: &str) -> ScoringClient {
    ScoringClient::with_base_url("test-key", Some(30), "bulkscore-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn build_url_targets_companies_for_domain_mode() {
    let client = test_client("https://api.madkudu.com/v1");
    let url = client
        .build_url(ScoreMode::Domain, &LookupKey::from("foo.com"))
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.madkudu.com/v1/companies?domain=foo.com"
    );
}

#[test]
fn build_url_targets_persons_for_email_mode() {
    let client = test_client("https://api.madkudu.com/v1/");
    let url = client
        .build_url(ScoreMode::Email, &LookupKey::from("jane@foo.com"))
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.madkudu.com/v1/persons?email=jane%40foo.com"
    );
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("https://api.madkudu.com/v1");
    let url = client
        .build_url(ScoreMode::Email, &LookupKey::from("a+b&c@foo.com"))
        .unwrap();
    assert!(
        url.as_str().contains("email=a%2Bb%26c%40foo.com"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ScoringClient::with_base_url("k", None, "ua", "not a url");
    assert!(matches!(result, Err(ScoringError::InvalidBaseUrl { .. })));
}

#[test]
fn debug_output_redacts_api_key() {
    let client = test_client("https://api.madkudu.com/v1");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("test-key"), "api key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
