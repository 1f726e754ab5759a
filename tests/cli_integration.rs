// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the grove CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Trees 1-2-3 in a healthy line, 4 infected next to 3, 5 on its own
struct Fixture {
    dir: TempDir,
    trees: PathBuf,
    paths: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let trees = dir.path().join("trees.csv");
        let paths = dir.path().join("paths.csv");
        let config = dir.path().join("grove.toml");
        fs::write(
            &trees,
            "tree_id,species,age,health_status\n\
             1,Oak,120,HEALTHY\n\
             2,Oak,80,HEALTHY\n\
             3,Pine,45,HEALTHY\n\
             4,Birch,30,INFECTED\n\
             5,Maple,60,HEALTHY\n",
        )
        .unwrap();
        fs::write(&paths, "tree_1,tree_2,distance\n1,2,5\n2,3,5\n3,4,2\n").unwrap();
        fs::write(&config, "").unwrap();
        Self {
            dir,
            trees,
            paths,
            config,
        }
    }

    fn grove(&self) -> Command {
        let mut cmd = Command::cargo_bin("grove").unwrap();
        cmd.arg("--no-color")
            .arg("--config")
            .arg(&self.config)
            .arg("--trees")
            .arg(&self.trees)
            .arg("--paths")
            .arg(&self.paths);
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.grove().arg("--json").args(args).output().unwrap();
        assert!(output.status.success(), "grove {args:?} failed");
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn test_path_text_output() {
    let fx = Fixture::new();
    fx.grove()
        .args(["path", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 -> 2 -> 3"))
        .stdout(predicate::str::contains("distance: 10"));
}

#[test]
fn test_path_json_output() {
    let fx = Fixture::new();
    let result = fx.json(&["path", "1", "4"]);
    assert_eq!(result["path"], serde_json::json!([1, 2, 3, 4]));
    assert_eq!(result["distance"], serde_json::json!(12.0));
}

#[test]
fn test_path_json_marks_unreachable_with_null() {
    let fx = Fixture::new();
    let result = fx.json(&["path", "1", "5"]);
    assert_eq!(result["path"], serde_json::json!([]));
    assert_eq!(result["distance"], serde_json::Value::Null);
}

#[test]
fn test_path_unreachable_and_unknown() {
    let fx = Fixture::new();
    fx.grove()
        .args(["path", "1", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path between 1 and 5"));

    fx.grove()
        .args(["path", "1", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tree not found: 42"));
}

#[test]
fn test_reserves_modes() {
    let fx = Fixture::new();
    let all = fx.json(&["reserves"]);
    assert_eq!(all, serde_json::json!([[1, 2, 3], [5]]));

    let isolated = fx.json(&["reserves", "--mode", "isolated"]);
    assert_eq!(isolated, serde_json::json!([[5]]));

    let large = fx.json(&["reserves", "--min-size", "2"]);
    assert_eq!(large, serde_json::json!([[1, 2, 3]]));

    fx.grove()
        .args(["reserves", "--mode", "wide"])
        .assert()
        .failure();
}

#[test]
fn test_reserves_mode_from_config() {
    let fx = Fixture::new();
    fs::write(&fx.config, "[reserves]\nmode = \"isolated\"\n").unwrap();
    assert_eq!(fx.json(&["reserves"]), serde_json::json!([[5]]));
}

#[test]
fn test_infect_writes_updated_trees() {
    let fx = Fixture::new();
    let out = fx.dir.path().join("after.csv");

    fx.grove()
        .args(["infect", "4", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Infection order (4 trees)"))
        .stdout(predicate::str::contains("3 <- 4"));

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.matches("INFECTED").count(), 4);
    assert!(written.contains("5,Maple,60,HEALTHY"));
}

#[test]
fn test_infect_reports_failed_write() {
    let fx = Fixture::new();
    fx.grove()
        .args(["infect", "4", "--output"])
        .arg(fx.dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_infect_reports_full_disk() {
    let fx = Fixture::new();
    fx.grove()
        .args(["infect", "4", "--output", "/dev/full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write to /dev/full"));
}

#[test]
fn test_infect_json_order() {
    let fx = Fixture::new();
    let events = fx.json(&["infect", "4"]);
    let order: Vec<u64> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["tree"].as_u64().unwrap())
        .collect();
    assert_eq!(order, vec![4, 3, 2, 1]);
    assert_eq!(events[0]["source"], serde_json::Value::Null);
}

#[test]
fn test_infect_from_healthy_tree_does_nothing() {
    let fx = Fixture::new();
    fx.grove()
        .args(["infect", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("must start from an INFECTED tree"));
}

#[test]
fn test_layout_is_reproducible_with_seed() {
    let fx = Fixture::new();
    let args = ["layout", "--seed", "11", "--iterations", "50"];
    let first = fx.json(&args);
    let second = fx.json(&args);

    assert_eq!(first, second);
    let placements = first.as_array().unwrap();
    assert_eq!(placements.len(), 5);
    for p in placements {
        let (x, y) = (p["x"].as_f64().unwrap(), p["y"].as_f64().unwrap());
        assert!((0.0..=100.0).contains(&x));
        assert!((0.0..=100.0).contains(&y));
    }
}

#[test]
fn test_layout_rejects_empty_canvas() {
    let fx = Fixture::new();
    fx.grove()
        .args(["layout", "--width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive size"));
}

#[test]
fn test_stats() {
    let fx = Fixture::new();
    let summary = fx.json(&["stats"]);
    assert_eq!(summary["total_trees"], 5);
    assert_eq!(summary["total_paths"], 3);
    assert_eq!(summary["reserve_count"], 2);
    assert_eq!(summary["max_reserve_size"], 3);
    assert_eq!(summary["health_counts"]["INFECTED"], 1);

    fx.grove()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Forest Summary"))
        .stdout(predicate::str::contains("infection rate: 20.0%"));
}

#[test]
fn test_export_dot_to_stdout() {
    let fx = Fixture::new();
    fx.grove()
        .args(["export", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph forest {"))
        .stdout(predicate::str::contains("3 -- 4"));
}

#[test]
fn test_export_csv_writes_both_files() {
    let fx = Fixture::new();
    let out = fx.dir.path().join("snapshot.csv");

    fx.grove()
        .args(["export", "--format", "csv", "--output"])
        .arg(&out)
        .assert()
        .success();

    let trees = fs::read_to_string(&out).unwrap();
    let paths = fs::read_to_string(fx.dir.path().join("snapshot-paths.csv")).unwrap();
    assert!(trees.starts_with("tree_id,species,age,health_status"));
    assert_eq!(trees.lines().count(), 6);
    assert_eq!(paths.lines().count(), 4);

    // The export loads back as the same forest.
    Command::cargo_bin("grove")
        .unwrap()
        .arg("--config")
        .arg(&fx.config)
        .arg("--trees")
        .arg(&out)
        .arg("--paths")
        .arg(fx.dir.path().join("snapshot-paths.csv"))
        .args(["path", "1", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance: 12"));
}

#[test]
fn test_bad_rows_are_skipped_with_warning() {
    let fx = Fixture::new();
    fs::write(&fx.paths, "tree_1,tree_2,distance\n1,2,5\n1,99,3\n2,2,1\n").unwrap();

    fx.grove()
        .args(["path", "1", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped 2 row(s)"));
}

#[test]
fn test_missing_trees_file_fails() {
    let fx = Fixture::new();
    fs::remove_file(&fx.trees).unwrap();
    fx.grove()
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load forest"));
}

#[test]
fn test_config_key_lookup() {
    let fx = Fixture::new();
    fs::write(&fx.config, "[layout]\nwidth = 640.0\n").unwrap();
    fx.grove()
        .args(["config", "layout.width"])
        .assert()
        .success()
        .stdout(predicate::str::contains("640"));

    fx.grove().args(["config", "nope"]).assert().failure();
}

#[test]
fn test_no_color_env_accepts_common_values() {
    let fx = Fixture::new();
    for value in ["1", "true", "yes-please"] {
        Command::cargo_bin("grove")
            .unwrap()
            .env("NO_COLOR", value)
            .arg("--config")
            .arg(&fx.config)
            .arg("--trees")
            .arg(&fx.trees)
            .arg("--paths")
            .arg(&fx.paths)
            .arg("stats")
            .assert()
            .success()
            .stdout(predicate::str::contains("HEALTHY"))
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn test_completions() {
    Command::cargo_bin("grove")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grove"));
}
