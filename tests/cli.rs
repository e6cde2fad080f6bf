use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs the binary against an empty config dir so the built-in catalog is used
/// regardless of what is installed on the machine.
fn filterstate(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("filterstate").unwrap();
    cmd.env("FILTERSTATE_CONFIG", config_dir.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn keys_lists_builtin_catalog() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .arg("keys")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("timeRange"));
}

#[test]
fn set_replaces_values_and_keeps_foreign_params() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["set", "token=abc&status=Pending&page=3", "status", "Resolved", "Rejected"])
        .assert()
        .success()
        .stdout("token=abc&status=Resolved&status=Rejected\n");
}

#[test]
fn set_without_values_clears_filter() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["set", "?status=Pending&category=tuition", "status"])
        .assert()
        .success()
        .stdout("category=tuition\n");
}

#[test]
fn parent_change_drops_child_param() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["set", "timeRange=date&date=2024-05-01", "timeRange", "today"])
        .assert()
        .success()
        .stdout("timeRange=today\n");
}

#[test]
fn child_write_requires_active_trigger() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["child", "timeRange=date", "date", "2024-05-01"])
        .assert()
        .success()
        .stdout("timeRange=date&date=2024-05-01\n");

    filterstate(&temp)
        .args(["child", "timeRange=today", "date", "2024-05-01"])
        .assert()
        .success()
        .stdout("timeRange=today\n");
}

#[test]
fn decode_keeps_duplicates() {
    let temp = TempDir::new().unwrap();
    let output = filterstate(&temp)
        .args(["decode", "status=Pending&status=Pending&status=Resolved&empty="])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["status"],
        serde_json::json!(["Pending", "Pending", "Resolved"])
    );
    assert!(json.get("empty").is_none());
}

#[test]
fn page_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let output = filterstate(&temp)
        .args(["page", "page=-5&pageSize=25"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!({"page": 1, "pageSize": 10}));
}

#[test]
fn page_size_change_resets_page() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["page", "page=4&status=Pending", "--size", "20"])
        .assert()
        .success()
        .stdout("status=Pending&pageSize=20\n");
}

#[test]
fn clear_keeps_foreign_params() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .args(["clear", "token=t&status=Pending&page=2&date=x"])
        .assert()
        .success()
        .stdout("token=t\n");
}

#[test]
fn submit_reports_filters_children_and_page() {
    let temp = TempDir::new().unwrap();
    let output = filterstate(&temp)
        .args(["submit", "status=Pending&timeRange=date&date=2024-05-01&page=2&token=t"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["filters"]["status"], serde_json::json!(["Pending"]));
    assert!(json["filters"].get("token").is_none());
    assert_eq!(json["children"]["date"], "2024-05-01");
    assert_eq!(json["page"]["page"], 2);
}

#[test]
fn show_marks_selected_options() {
    let temp = TempDir::new().unwrap();
    filterstate(&temp)
        .env("NO_COLOR", "1")
        .args(["show", "status=Resolved"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Resolved"))
        .stdout(predicate::str::contains("[ ] Pending"));
}

#[test]
fn custom_config_is_loaded() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("filters.json"),
        r#"{"filters": [{"key": "state", "param": "s", "label": "State", "multiselect": true,
             "options": [{"label": "Open", "value": "open"}]}]}"#,
    )
    .unwrap();

    filterstate(&temp)
        .args(["set", "", "state", "open"])
        .assert()
        .success()
        .stdout("s=open\n");

    filterstate(&temp)
        .args(["set", "status=Pending", "status", "Resolved"])
        .assert()
        .success()
        .stdout("status=Pending\n");
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("filters.json"),
        r#"{"filters": [{"key": "a", "label": "A"}, {"key": "a", "label": "B"}]}"#,
    )
    .unwrap();

    filterstate(&temp)
        .arg("keys")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate filter key: a"));
}
