//! End-to-end tests for the kfcli binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const C_MAJOR_TRIAD: &str = "10,1,1,1,8,1,1,9,1,1,1,1";

/// Command isolated from the caller's KEYFINDER_* environment and local config.
fn kfcli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kfcli").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("KEYFINDER_CONFIG")
        .env_remove("KEYFINDER_FORMAT")
        .env_remove("KEYFINDER_PRECISION")
        .env_remove("KEYFINDER_SPELLING")
        .env_remove("KEYFINDER_SHOW_TABLE")
        .env_remove("KEYFINDER_LOG_LEVEL");
    cmd
}

#[test]
fn estimate_prints_table_and_summary() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", C_MAJOR_TRIAD])
        .assert()
        .success()
        .stdout(predicate::str::contains("Major key coefficients:\nC: 0.87\n"))
        .stdout(predicate::str::contains("Minor key coefficients:"))
        .stdout(predicate::str::ends_with(
            "Most likely: C major\nAlso possible: E minor\n",
        ));
}

#[test]
fn estimate_accepts_space_separated_values() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "--no-table"])
        .args(C_MAJOR_TRIAD.split(','))
        .assert()
        .success()
        .stdout("Most likely: C major\nAlso possible: E minor\n");
}

#[test]
fn estimate_json_output() {
    let dir = TempDir::new().unwrap();
    let output = kfcli(&dir)
        .args(["estimate", "--json", C_MAJOR_TRIAD])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["best"]["tonic"], 0);
    assert_eq!(report["best"]["mode"], "major");
    assert_eq!(report["alternate"]["tonic"], 4);
    assert_eq!(report["alternate"]["mode"], "minor");
    assert_eq!(report["table"].as_array().unwrap().len(), 24);
}

#[test]
fn estimate_reads_chromagram_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chroma.json");
    // Two frames summing to the C major triad
    fs::write(
        &path,
        r#"{"chroma": [[5,0.5,0.5,0.5,4,0.5,0.5,4.5,0.5,0.5,0.5,0.5],
                       [5,0.5,0.5,0.5,4,0.5,0.5,4.5,0.5,0.5,0.5,0.5]]}"#,
    )
    .unwrap();

    kfcli(&dir)
        .args(["estimate", "--no-table", "--input"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Most likely: C major"));
}

#[test]
fn estimate_reads_stdin_with_dash() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "--no-table", "--input", "-"])
        .write_stdin("[10,1,1,1,8,1,1,9,1,1,1,1]")
        .assert()
        .success()
        .stdout(predicate::str::contains("Most likely: C major"));
}

#[test]
fn estimate_reads_piped_stdin_without_args() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "--no-table"])
        .write_stdin("10 1 1 1 8 1 1 9 1 1 1 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Most likely: C major"));
}

#[test]
fn silent_input_fails_with_insufficient_signal() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "0,0,0,0,0,0,0,0,0,0,0,0"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("insufficient signal"));
}

#[test]
fn wrong_length_fails_with_shape_error() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 12 pitch-class bins, got 3"));
}

#[test]
fn flats_and_precision_flags() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "--flats", "-p", "3", "1,10,1,1,1,8,1,1,9,1,1,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Db: 0.865"))
        .stdout(predicate::str::contains("Most likely: Db major"));
}

#[test]
fn precision_above_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .args(["estimate", "-p", "18", C_MAJOR_TRIAD])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("18"));

    kfcli(&dir)
        .args(["estimate", "--no-table", "-p", "17", C_MAJOR_TRIAD])
        .assert()
        .success();
}

#[test]
fn config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[report]\nshow_table = false\nspelling = \"flats\"\n").unwrap();

    kfcli(&dir)
        .arg("--config")
        .arg(&config)
        .args(["estimate", "1,10,1,1,1,8,1,1,9,1,1,1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Most likely: Db major\n"));
}

#[test]
fn local_config_is_discovered() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keyfinder.toml"), "[report]\nformat = \"json\"\n").unwrap();

    kfcli(&dir)
        .args(["estimate", C_MAJOR_TRIAD])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn env_override_beats_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("keyfinder.toml"), "[report]\nformat = \"json\"\n").unwrap();

    kfcli(&dir)
        .env("KEYFINDER_FORMAT", "text")
        .args(["estimate", "--no-table", C_MAJOR_TRIAD])
        .assert()
        .success()
        .stdout("Most likely: C major\nAlso possible: E minor\n");
}

#[test]
fn bad_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.toml");
    fs::write(&config, "[report]\nformat = \"yaml\"\n").unwrap();

    kfcli(&dir)
        .arg("--config")
        .arg(&config)
        .args(["estimate", C_MAJOR_TRIAD])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn batch_reports_each_file_in_order() {
    let dir = TempDir::new().unwrap();
    let c = dir.path().join("c.txt");
    let a = dir.path().join("a.json");
    fs::write(&c, "10 1 1 1 8 1 1 9 1 1 1 1\n").unwrap();
    // Minor profile rotated so its tonic weight sits on A
    let minor = [6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17];
    let rotated: Vec<String> = (0..12).map(|p| minor[(p + 12 - 9) % 12].to_string()).collect();
    fs::write(&a, format!("[{}]", rotated.join(","))).unwrap();

    kfcli(&dir)
        .arg("batch")
        .arg(&c)
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::contains("c.txt: C major"))
        .stdout(predicate::str::contains("a.json: A minor (1.00)"));
}

#[test]
fn batch_fails_when_any_file_fails() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.txt");
    let silent = dir.path().join("silent.txt");
    fs::write(&good, C_MAJOR_TRIAD).unwrap();
    fs::write(&silent, "0 0 0 0 0 0 0 0 0 0 0 0").unwrap();

    kfcli(&dir)
        .arg("batch")
        .arg(&good)
        .arg(&silent)
        .assert()
        .failure()
        .stdout(predicate::str::contains("good.txt: C major"))
        .stderr(predicate::str::contains("silent.txt: error"))
        .stderr(predicate::str::contains("1 of 2 inputs failed"));
}

#[test]
fn batch_json_includes_errors() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    let output = kfcli(&dir)
        .args(["batch", "--json"])
        .arg(&missing)
        .output()
        .unwrap();
    assert!(!output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entry = &entries.as_array().unwrap()[0];
    assert!(entry["error"].as_str().unwrap().contains("reading"));
    assert!(entry.get("report").is_none());
}

#[test]
fn config_subcommand_prints_effective_config() {
    let dir = TempDir::new().unwrap();
    kfcli(&dir)
        .env("KEYFINDER_PRECISION", "5")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[report]"))
        .stdout(predicate::str::contains("precision = 5"))
        .stdout(predicate::str::contains("# env: KEYFINDER_PRECISION"));
}
