//! Tests for budget table configuration loading.

use std::io::Write;
use vermeer_rate_limit::VermeerConfig;

#[test]
fn bundled_defaults_load() {
    let config = VermeerConfig::load().expect("bundled defaults should parse");
    let policy = config.budget_policy();

    assert_eq!(policy.resolve("gpt-3.5-turbo"), 500);
    assert_eq!(policy.resolve("gemini/gemini-2.0-flash"), 2000);
    assert_eq!(policy.resolve("unknown"), 100);
}

#[test]
fn from_file_reads_custom_budgets() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    writeln!(
        file,
        r#"
fallback_rpm = 42

[[budgets]]
model = "in-house-model"
rpm = 7
"#
    )
    .expect("write temp config");

    let config = VermeerConfig::from_file(file.path()).expect("config should parse");
    assert_eq!(config.fallback_rpm, 42);
    assert_eq!(config.budgets.len(), 1);

    let policy = config.budget_policy();
    assert_eq!(policy.resolve("in-house-model"), 7);
    assert_eq!(policy.resolve("lab/in-house-model-v2"), 7);
    assert_eq!(policy.resolve("other"), 42);
}

#[test]
fn from_file_rejects_missing_path() {
    assert!(VermeerConfig::from_file("/nonexistent/vermeer.toml").is_err());
}

#[test]
fn file_order_is_resolution_order() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    writeln!(
        file,
        r#"
[[budgets]]
model = "model"
rpm = 1

[[budgets]]
model = "model-pro"
rpm = 2
"#
    )
    .expect("write temp config");

    let policy = VermeerConfig::from_file(file.path())
        .expect("config should parse")
        .budget_policy();
    // First row wins the substring race.
    assert_eq!(policy.resolve("x/model-pro-max"), 1);
}
