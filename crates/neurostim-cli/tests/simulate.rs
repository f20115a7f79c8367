use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::{fs, path::PathBuf};
use tempfile::tempdir;

#[test]
fn simulate_from_design_is_reproducible() {
    let temp = tempdir().unwrap();
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    let design = workspace_root.join("test_data/sim_design.toml");
    let first = temp.path().join("first.csv");
    let second = temp.path().join("second.csv");
    for out in [&first, &second] {
        cargo_bin_cmd!("neurostim")
            .args([
                "simulate",
                "--design",
                design.to_str().unwrap(),
                "--out",
                out.to_str().unwrap(),
            ])
            .assert()
            .success();
    }
    let a = fs::read_to_string(&first).unwrap();
    let b = fs::read_to_string(&second).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lines().count(), 42);
    assert!(a.starts_with("time,voltage,frequency,duration"));
}

#[test]
fn simulated_table_feeds_analyze() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("sim.csv");
    cargo_bin_cmd!("neurostim")
        .args([
            "simulate",
            "--seed",
            "9",
            "--points",
            "30",
            "--out",
            out.to_str().unwrap(),
        ])
        .assert()
        .success();
    let output = cargo_bin_cmd!("neurostim")
        .args(["analyze", "--input", out.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let js: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(js["summary"]["sample_count"], 30);
}
