// SPDX-License-Identifier: Apache-2.0
//
// Toupcam CLI - Camera Listing Tests
//
// TESTING LAYERS:
//
// Layer 1 (Unit Tests - No hardware required):
//   - Help text and command structure
//   - Invalid argument handling
//
// Layer 3 (Hardware Integration - Requires a ToupTek camera):
//   - Camera listing, line format, JSON output
//
// RUN LAYER 1:
//   cargo test --test list_cli
//
// RUN LAYER 3 (on hardware):
//   cargo test --test list_cli -- --ignored --nocapture

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use std::env;

/// Helper to create a Command for the toupcam binary
fn toupcam_cmd() -> Command {
    let mut cmd = if let Ok(bin_path) = env::var("TOUPCAM_BIN") {
        Command::new(bin_path)
    } else {
        // Default: use cargo run
        let mut c = Command::new("cargo");
        c.args(["run", "--bin", "toupcam", "--"]);
        c
    };

    // Pass library location through for runtime loading
    if let Ok(lib) = env::var("TOUPCAM_LIBRARY") {
        cmd.env("TOUPCAM_LIBRARY", lib);
    }
    if let Ok(ld_library_path) = env::var("LD_LIBRARY_PATH") {
        cmd.env("LD_LIBRARY_PATH", ld_library_path);
    }

    cmd
}

// =============================================================================
// Layer 1: Basic Command Tests (No Hardware Required)
// =============================================================================

#[test]
fn test_help_lists_subcommands() {
    toupcam_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("capture"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_list_help() {
    toupcam_cmd()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("capability"))
        .stdout(predicate::str::contains("--ids"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_capture_help() {
    toupcam_cmd()
        .args(["capture", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--id"))
        .stdout(predicate::str::contains("--count"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_unknown_subcommand_fails() {
    toupcam_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_capture_zero_count_is_rejected() {
    toupcam_cmd()
        .args(["capture", "--count", "0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("count"));
}

#[test]
fn test_capture_negative_interval_is_rejected() {
    toupcam_cmd()
        .args(["capture", "--interval", "-1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("interval"));
}

// =============================================================================
// Layer 3: Hardware Tests (Requires a ToupTek Camera)
// =============================================================================

#[test]
#[serial]
#[ignore = "requires a connected ToupTek camera (run with --ignored on hardware)"]
fn test_list_line_format() {
    toupcam_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cam#0: CameraProperties(cid=0"));
}

#[test]
#[serial]
#[ignore = "requires a connected ToupTek camera (run with --ignored on hardware)"]
fn test_list_json_is_well_formed() {
    let output = toupcam_cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value =
        serde_json::from_slice(&output).expect("list --json must emit valid JSON");
    let count = parsed["count"].as_u64().expect("count field");
    assert_eq!(
        parsed["cameras"].as_array().expect("cameras array").len() as u64,
        count
    );
}

#[test]
#[serial]
#[ignore = "requires a connected ToupTek camera (run with --ignored on hardware)"]
fn test_list_ids_matches_json_count() {
    let ids = toupcam_cmd()
        .args(["list", "--ids"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let ids: Vec<&str> = std::str::from_utf8(&ids)
        .expect("ids output is text")
        .lines()
        .collect();
    assert!(ids.iter().all(|id| !id.is_empty()));

    let json = toupcam_cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value =
        serde_json::from_slice(&json).expect("list --json must emit valid JSON");
    assert_eq!(
        parsed["cameras"].as_array().expect("cameras array").len(),
        ids.len()
    );
}

#[test]
#[serial]
#[ignore = "requires a connected ToupTek camera (run with --ignored on hardware)"]
fn test_capture_single_frame() {
    let dir = env::temp_dir().join("toupcam-cli-test");
    std::fs::create_dir_all(&dir).unwrap();
    let prefix = dir.join("test_image");

    toupcam_cmd()
        .args([
            "capture",
            "--count",
            "1",
            "--output",
            prefix.to_str().unwrap(),
        ])
        .assert()
        .success();

    assert!(dir.join("test_image-00.jpg").exists());
}
