//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build command for the netresolve-cli binary (finds it in target/debug when run via cargo test).
fn netresolve_cli() -> Command {
    cargo_bin_cmd!("netresolve-cli")
}

/// Path to netresolve library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("netresolve")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = netresolve_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("netlist"));
}

#[test]
fn test_cli_version() {
    let mut cmd = netresolve_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_netlist_text() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("single_source.json");

    cmd.arg("netlist").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::eq("V V1 0 N1 5\nGND 0\n"));
}

#[test]
fn test_cli_netlist_unconnected() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("two_resistors.json");

    cmd.arg("netlist").arg(path).arg("--dangling").arg("unconnected");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("R R2 N1 UNCONNECTED 1000"))
        .stdout(predicate::str::ends_with("GND 0\n"));
}

#[test]
fn test_cli_netlist_json() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("rc_lowpass.json");

    cmd.arg("netlist").arg(path).arg("--format").arg("json");

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &json["results"][0];
    assert_eq!(result["ground"], "0");
    assert_eq!(result["ac_sources"][0], "ACV1");
    assert_eq!(result["records"][0]["type"], "element");
    assert_eq!(result["records"][0]["family"], "ACVoltageSource");
    assert_eq!(result["records"][3]["type"], "ground");
}

#[test]
fn test_cli_nodes() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("nodes").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 (ground): (0, 200)"))
        .stdout(predicate::str::contains("N2: (100, 100)"));
}

#[test]
fn test_cli_probe_hit() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("probe")
        .arg(path)
        .args(["--x", "100", "--y", "150"]);

    cmd.assert().success().stdout(predicate::eq("I(R2)\n"));
}

#[test]
fn test_cli_probe_voltage_with_negative_coordinate() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("probe")
        .arg(path)
        .args(["--x", "106", "--y", "-3"]);

    cmd.assert().success().stdout(predicate::eq("N1\n"));
}

#[test]
fn test_cli_probe_miss() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("probe")
        .arg(path)
        .args(["--x", "50", "--y", "50"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No probe target"));
}

#[test]
fn test_cli_empty_circuit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");
    std::fs::write(&path, "{}").unwrap();

    let mut cmd = netresolve_cli();
    cmd.arg("netlist").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("circuit is empty"));
}

#[test]
fn test_cli_missing_file() {
    let mut cmd = netresolve_cli();

    cmd.arg("netlist").arg("nonexistent.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_project() {
    let dir = TempDir::new().unwrap();
    for name in ["single_source.json", "voltage_divider.json"] {
        std::fs::copy(fixtures_dir().join(name), dir.path().join(name)).unwrap();
    }

    let mut cmd = netresolve_cli();
    cmd.arg("project").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("single_source.json"))
        .stdout(predicate::str::contains("R R2 N2 0 2000"));
}

#[test]
fn test_cli_project_ignores_other_json() {
    let dir = TempDir::new().unwrap();
    std::fs::copy(
        fixtures_dir().join("single_source.json"),
        dir.path().join("single_source.json"),
    )
    .unwrap();
    std::fs::write(dir.path().join("tsconfig.json"), "[]").unwrap();

    let mut cmd = netresolve_cli();
    cmd.arg("project").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::eq("V V1 0 N1 5\nGND 0\n"));
}

#[test]
fn test_cli_probe_json_includes_component() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("probe")
        .arg(path)
        .args(["--x", "100", "--y", "150", "--format", "json"]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["label"], "I(R2)");
    assert_eq!(json["target"]["kind"], "current");
    assert_eq!(json["component"]["family"], "Resistor");
    assert_eq!(json["component"]["value"], 2000.0);
}

#[test]
fn test_cli_probe_json_voltage_has_no_component() {
    let mut cmd = netresolve_cli();
    let path = fixtures_dir().join("voltage_divider.json");

    cmd.arg("probe")
        .arg(path)
        .args(["--x", "106", "--y", "-3", "--format", "json"]);

    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["label"], "N1");
    assert!(json["component"].is_null());
}

#[test]
fn test_cli_families() {
    let mut cmd = netresolve_cli();

    cmd.arg("families");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ACV"))
        .stdout(predicate::str::contains("default 1000"));
}
