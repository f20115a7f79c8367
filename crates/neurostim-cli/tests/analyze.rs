use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::{error::Error, fs, path::PathBuf};

#[test]
fn analyze_reports_closed_intervals_only() -> Result<(), Box<dyn Error>> {
    let recording = sample_path("test_data/recording_a.csv");
    let output = cargo_bin_cmd!("neurostim")
        .args(["analyze", "--input", &recording])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let actual: Value = serde_json::from_slice(&output)?;

    let intervals = actual["intervals"].as_array().expect("intervals array");
    assert_eq!(intervals.len(), 2);
    assert_close(intervals[0]["start_time"].as_f64().unwrap(), 0.1, 1e-9);
    assert_close(intervals[0]["end_time"].as_f64().unwrap(), 0.4, 1e-9);
    assert_eq!(intervals[0]["peak_level"], "high");
    assert_close(intervals[1]["start_time"].as_f64().unwrap(), 0.6, 1e-9);
    assert_eq!(intervals[1]["peak_level"], "low");

    let summary = &actual["summary"];
    assert_eq!(summary["sample_count"], 10);
    assert_eq!(summary["active_interval_count"], 2);
    assert_eq!(summary["peak_level"], "high");
    assert_close(summary["active_time_s"].as_f64().unwrap(), 0.4, 1e-9);
    Ok(())
}

#[test]
fn analyze_flushes_trailing_run_on_request() -> Result<(), Box<dyn Error>> {
    let recording = sample_path("test_data/recording_a.csv");
    let output = cargo_bin_cmd!("neurostim")
        .args(["analyze", "--input", &recording, "--flush-trailing"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let actual: Value = serde_json::from_slice(&output)?;
    let intervals = actual["intervals"].as_array().expect("intervals array");
    assert_eq!(intervals.len(), 3);
    assert_close(intervals[2]["start_time"].as_f64().unwrap(), 0.8, 1e-9);
    assert_close(intervals[2]["end_time"].as_f64().unwrap(), 0.9, 1e-9);
    assert_eq!(intervals[2]["peak_level"], "medium");
    Ok(())
}

#[test]
fn analyze_reads_stdin() -> Result<(), Box<dyn Error>> {
    let csv = fs::read_to_string(workspace_root().join("test_data/recording_a.csv"))?;
    let output = cargo_bin_cmd!("neurostim")
        .arg("analyze")
        .write_stdin(csv)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let actual: Value = serde_json::from_slice(&output)?;
    assert_eq!(actual["samples"].as_array().map(Vec::len), Some(10));
    assert_eq!(actual["samples"][3]["level"], "high");
    Ok(())
}

#[test]
fn analyze_rejects_missing_column() {
    let path = sample_path("test_data/missing_duration.csv");
    let assert = cargo_bin_cmd!("neurostim")
        .args(["analyze", "--input", &path])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("missing duration column"), "stderr: {}", stderr);
}

#[test]
fn analyze_rejects_unordered_time() {
    let path = sample_path("test_data/unordered.csv");
    let assert = cargo_bin_cmd!("neurostim")
        .args(["analyze", "--input", &path])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("does not increase"), "stderr: {}", stderr);
}

fn assert_close(a: f64, b: f64, tol: f64) {
    let diff = (a - b).abs();
    assert!(
        diff <= tol,
        "diff {} exceeded tol {} ({} vs {})",
        diff,
        tol,
        a,
        b
    );
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join(relative)
        .to_string_lossy()
        .to_string()
}
