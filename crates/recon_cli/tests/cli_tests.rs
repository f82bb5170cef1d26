use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get the absolute path to a test fixture
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Helper to create a Command for the recon binary, running in `dir`
// TODO: Migrate to cargo::cargo_bin_cmd! macro when available
// See: https://github.com/assert-rs/assert_cmd/issues/139
#[allow(deprecated)]
fn recon(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("recon").expect("Failed to find recon binary");
    cmd.current_dir(dir.path());
    cmd
}

// ============================================================================
// diff command tests
// ============================================================================

#[test]
fn test_diff_identical_datasets() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("diff")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Reconciliation PASSED"))
        .stdout(predicate::str::contains("Workbook written to"));

    assert!(dir
        .path()
        .join("output")
        .join("positional_row_diffs.xlsx")
        .is_file());
}

#[test]
fn test_diff_missing_row_fails() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("diff")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers_short.json"))
        .arg("-o")
        .arg("drivers.xlsx")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Reconciliation FAILED"))
        .stdout(predicate::str::contains("Row count difference 1"));

    assert!(dir.path().join("output/drivers.xlsx").is_file());
}

#[test]
fn test_diff_json_output() {
    let dir = TempDir::new().unwrap();

    let output = recon(&dir)
        .arg("diff")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers_short.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["summary"]["reference_rows"], 3);
    assert_eq!(json["summary"]["candidate_rows"], 2);
    assert_eq!(json["summary"]["mismatched_rows"], 1);
}

#[test]
fn test_diff_with_config_output_dir() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("diff")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers.json"))
        .arg("--config")
        .arg(fixture_path("recon.toml"))
        .assert()
        .success();

    assert!(dir
        .path()
        .join("reports")
        .join("positional_row_diffs.xlsx")
        .is_file());
}

#[test]
fn test_diff_missing_file() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("diff")
        .arg("nonexistent.json")
        .arg(fixture_path("landing_drivers.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// schema command tests
// ============================================================================

#[test]
fn test_schema_matches_yaml_contract() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("schema")
        .arg(fixture_path("drivers_contract.yml"))
        .arg(fixture_path("observed_drivers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("AIRBNBDRIVERS"))
        .stdout(predicate::str::contains("matches its contract"));
}

#[test]
fn test_schema_matches_toml_contract() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("schema")
        .arg(fixture_path("drivers_contract.toml"))
        .arg(fixture_path("observed_drivers.json"))
        .assert()
        .success();
}

#[test]
fn test_schema_extra_column_fails() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("schema")
        .arg(fixture_path("drivers_contract.yml"))
        .arg(fixture_path("observed_drivers_extra.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("does not match its contract"))
        .stdout(predicate::str::contains("Unexpected columns: extra_col"));
}

#[test]
fn test_schema_json_output() {
    let dir = TempDir::new().unwrap();

    let output = recon(&dir)
        .arg("schema")
        .arg(fixture_path("drivers_contract.yml"))
        .arg(fixture_path("observed_drivers_extra.json"))
        .arg("-f")
        .arg("json")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["check"]["unexpected"][0], "extra_col");
}

#[test]
fn test_schema_invalid_contract() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("schema")
        .arg(fixture_path("invalid_contract.yml"))
        .arg(fixture_path("observed_drivers.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// hash command tests
// ============================================================================

#[test]
fn test_hash_identical_datasets() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("hash")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("hash integrity validated"));
}

#[test]
fn test_hash_duplicates_fail() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("hash")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("silver_drivers_duplicated.json"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Duplicate hashes in landing"))
        .stdout(predicate::str::contains("missing hashes present in bronze"));
}

#[test]
fn test_hash_column_subset() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("hash")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers_renamed.json"))
        .assert()
        .failure();

    // the renamed forename is outside the hashed columns
    recon(&dir)
        .arg("hash")
        .arg(fixture_path("bronze_drivers.json"))
        .arg(fixture_path("landing_drivers_renamed.json"))
        .arg("--columns")
        .arg("driverId,code")
        .assert()
        .success();
}

// ============================================================================
// report command tests
// ============================================================================

#[test]
fn test_report_writes_html() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("report")
        .arg("--run-results")
        .arg(fixture_path("run_results.json"))
        .arg("--manifest")
        .arg(fixture_path("manifest.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 | Passed: 1 | Failed: 1 | Errors: 0"))
        .stdout(predicate::str::contains("Overall status: FAILED"));

    let html = fs::read_to_string(dir.path().join("dbt_test_report.html")).unwrap();
    assert!(html.contains("not_null_silver_drivers_code"));
    assert!(
        html.find("not_null_silver_drivers_code").unwrap()
            < html.find("unique_silver_drivers_driverId").unwrap()
    );
    assert!(html.contains("1.25s"));
}

#[test]
fn test_report_custom_output() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("report")
        .arg("--run-results")
        .arg(fixture_path("run_results.json"))
        .arg("--manifest")
        .arg(fixture_path("manifest.json"))
        .arg("-o")
        .arg("reports/tests.html")
        .assert()
        .success();

    assert!(dir.path().join("reports/tests.html").is_file());
}

#[test]
fn test_report_missing_results() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// general CLI tests
// ============================================================================

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Layer reconciliation"))
        .stdout(predicate::str::contains("diff"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("hash"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("recon"));
}

#[test]
fn test_verbose_flag() {
    let dir = TempDir::new().unwrap();

    recon(&dir)
        .arg("-v")
        .arg("schema")
        .arg(fixture_path("drivers_contract.yml"))
        .arg(fixture_path("observed_drivers.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}
