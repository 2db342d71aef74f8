use std::process::Command;

fn fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    format!("{manifest_dir}/tests/fixtures/{name}")
}

fn confaudit_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_confaudit"))
}

#[test]
fn test_audit_router_fixture_text() {
    let output = confaudit_cmd()
        .args(["audit", &fixture("router.cfg")])
        .output()
        .expect("failed to run confaudit audit");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "audit failed: stdout={stdout}, stderr={stderr}"
    );
    assert!(stdout.contains("router"), "should detect a router: {stdout}");
    assert!(stdout.contains("Findings"), "should list findings: {stdout}");
    // The fixture keeps a plaintext enable password, so at least one FAIL.
    assert!(stdout.contains("FAIL"), "should contain failures: {stdout}");
}

#[test]
fn test_audit_router_fixture_json() {
    let output = confaudit_cmd()
        .args(["audit", &fixture("router.cfg"), "--format", "json"])
        .output()
        .expect("failed to run confaudit audit --format json");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("output should be valid JSON");

    assert_eq!(parsed["device"]["device_type"], "router");
    assert_eq!(parsed["device"]["confidence"], "high");
    assert_eq!(parsed["ruleset"], "cisco_router");
    assert_eq!(parsed["version"]["os_version"], "15.4");

    let findings = parsed["findings"].as_array().expect("findings array");
    assert!(!findings.is_empty());
    assert_eq!(
        parsed["summary"]["total"].as_u64().unwrap(),
        findings.len() as u64
    );

    // Plaintext enable password must be flagged.
    let enable_pw = findings
        .iter()
        .find(|f| f["id"] == "1.1.2")
        .expect("enable password rule present");
    assert_eq!(enable_pw["status"], "FAIL");
    assert!(enable_pw["evidence"]
        .as_str()
        .unwrap()
        .contains("enable password"));
}

#[test]
fn test_detect_l3_switch_fixture() {
    let output = confaudit_cmd()
        .args(["detect", &fixture("l3_switch.cfg")])
        .output()
        .expect("failed to run confaudit detect");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(
        stdout.contains("switch_l3"),
        "should detect an L3 switch: {stdout}"
    );
}

#[test]
fn test_detect_json_scores() {
    let output = confaudit_cmd()
        .args(["detect", &fixture("l3_switch.cfg"), "--format", "json"])
        .output()
        .expect("failed to run confaudit detect --format json");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("output should be valid JSON");
    assert_eq!(parsed["device_type"], "switch_l3");
    assert!(parsed["scores"]["l3_score"].as_u64().unwrap() >= 12);
    assert!(parsed["scores"]["switch_score"].as_u64().unwrap() >= 10);
}

#[test]
fn test_check_fails_on_router_fixture() {
    let output = confaudit_cmd()
        .args(["check", &fixture("router.cfg")])
        .output()
        .expect("failed to run confaudit check");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1 for failing checks: {stdout}"
    );
    assert!(stdout.contains("CHECK FAILED"), "should fail: {stdout}");
}

#[test]
fn test_check_passes_with_clean_ruleset() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let rules_path = dir.path().join("rules.json");
    std::fs::write(
        &rules_path,
        r#"[{"id": "1.1", "title": "Hostname set", "type": "regex_capture",
            "pattern": "^hostname\\s+\\S+", "expect": "present"}]"#,
    )
    .unwrap();

    let output = confaudit_cmd()
        .args([
            "check",
            &fixture("router.cfg"),
            "--rules",
            rules_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run confaudit check --rules");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "expected passing check: {stdout}"
    );
    assert!(stdout.contains("CHECK PASSED"), "should pass: {stdout}");
}

#[test]
fn test_check_json_output() {
    let output = confaudit_cmd()
        .args(["check", &fixture("router.cfg"), "--format", "json"])
        .output()
        .expect("failed to run confaudit check --format json");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("output should be valid JSON");
    assert_eq!(parsed["check"]["passed"], false);
    assert!(parsed["check"]["failing_count"].as_u64().unwrap() >= 1);
}

#[test]
fn test_audit_writes_csv_and_html_reports() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let csv_path = dir.path().join("report.csv");
    let html_path = dir.path().join("report.html");

    let output = confaudit_cmd()
        .args([
            "audit",
            &fixture("router.cfg"),
            "--csv",
            csv_path.to_str().unwrap(),
            "--html",
            html_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run confaudit audit with report outputs");

    assert!(output.status.success());

    let csv_content = std::fs::read_to_string(&csv_path).expect("CSV report written");
    assert!(csv_content.starts_with("ID,Section,Title,Status,Risk"));

    let html_content = std::fs::read_to_string(&html_path).expect("HTML report written");
    assert!(html_content.starts_with("<!DOCTYPE html>"));
    assert!(html_content.contains("Detected Device Type"));
}

#[test]
fn test_audit_with_unknown_rule_type_reports_manual() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let rules_path = dir.path().join("rules.json");
    std::fs::write(
        &rules_path,
        r#"[{"id": "9.9", "title": "Future check", "type": "quantum_scan"}]"#,
    )
    .unwrap();

    let output = confaudit_cmd()
        .args([
            "audit",
            &fixture("router.cfg"),
            "--rules",
            rules_path.to_str().unwrap(),
            "--format",
            "json",
        ])
        .output()
        .expect("failed to run confaudit audit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["findings"][0]["status"], "MANUAL");
    assert_eq!(parsed["findings"][0]["remark"], "Rule type not supported");
}

#[test]
fn test_init_creates_config() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let output = confaudit_cmd()
        .args(["init"])
        .current_dir(dir.path())
        .output()
        .expect("failed to run confaudit init");

    assert!(output.status.success(), "init should succeed");

    let config_path = dir.path().join(".confaudit.toml");
    assert!(config_path.exists(), ".confaudit.toml should be created");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[rulesets]"));
    assert!(content.contains("[check]"));
}

#[test]
fn test_init_refuses_overwrite() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join(".confaudit.toml"), "existing").unwrap();

    let output = confaudit_cmd()
        .args(["init"])
        .current_dir(dir.path())
        .output()
        .expect("failed to run confaudit init");

    assert!(!output.status.success(), "init should fail when file exists");
}

#[test]
fn test_missing_input_file_is_an_error() {
    let output = confaudit_cmd()
        .args(["audit", "/nonexistent/config.cfg"])
        .output()
        .expect("failed to run confaudit audit");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}
