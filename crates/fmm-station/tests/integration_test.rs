use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

struct StationProcess {
    dir: TempDir,
}

impl StationProcess {
    fn new() -> Self {
        Self {
            dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    fn run(&self, extra: &[&str]) -> Output {
        let log_dir = self.log_dir();
        let reference_dir = data_dir().join("reference");
        Command::new(env!("CARGO_BIN_EXE_fmm-station"))
            .arg("--second-ms")
            .arg("0")
            .arg("--log-dir")
            .arg(&log_dir)
            .arg("--reference-dir")
            .arg(&reference_dir)
            .args(extra)
            .env("RUST_LOG", "warn")
            .output()
            .expect("Failed to start fmm-station")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_manual_run_reports_good_part() {
    let station = StationProcess::new();
    let output = station.run(&["--pressure", "100", "--current", "100", "--manual-seconds", "10"]);
    let text = stdout(&output);

    assert!(output.status.success(), "{text}");
    assert!(text.contains("Control values set: pressure=100 current=100"));
    assert!(text.contains("GOOD PART - log: "));

    let logs: Vec<_> = std::fs::read_dir(station.log_dir()).unwrap().collect();
    assert_eq!(logs.len(), 1);
    let log = std::fs::read_to_string(logs[0].as_ref().unwrap().path()).unwrap();
    assert_eq!(log.lines().count(), 10);
    assert!(!log.ends_with('\n'));
}

#[test]
fn test_bundled_recipes_match_their_references() {
    let station = StationProcess::new();
    let recipes = data_dir().join("recipes");
    let output = station.run(&[
        "--strict-validation",
        "--recipe",
        recipes.join("recipe1.txt").to_str().unwrap(),
        "--recipe",
        recipes.join("recipe2.txt").to_str().unwrap(),
        "--recipe",
        recipes.join("recipe3.txt").to_str().unwrap(),
    ]);
    let text = stdout(&output);

    assert!(output.status.success(), "{text}");
    assert_eq!(text.matches("GOOD PART").count(), 3, "{text}");
}

#[test]
fn test_invalid_recipe_fails_the_process() {
    let station = StationProcess::new();
    let recipe = station.dir.path().join("bad.txt");
    std::fs::write(&recipe, "recipe1.csv,Spiral,20").unwrap();

    let output = station.run(&["--recipe", recipe.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Recipe failed: invalid recipe `Spiral`"));
}

#[test]
fn test_audit_trail_and_metrics() {
    let station = StationProcess::new();
    let audit = station.dir.path().join("audit.jsonl");
    let output = station.run(&[
        "--manual-seconds",
        "2",
        "--audit-log",
        audit.to_str().unwrap(),
        "--print-metrics",
    ]);
    let text = stdout(&output);

    assert!(output.status.success(), "{text}");
    assert!(text.contains("fmm_good_parts_total 1"), "{text}");

    let trail = std::fs::read_to_string(&audit).unwrap();
    let kinds: Vec<String> = trail
        .lines()
        .map(|line| {
            let entry: serde_json::Value = serde_json::from_str(line).unwrap();
            entry["event_type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, ["system_start", "manual_run", "system_shutdown"]);
}

#[test]
fn test_unknown_flag_is_rejected() {
    let station = StationProcess::new();
    let output = station.run(&["--turbo"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown flag `--turbo`"));
}

#[test]
fn test_overlong_manual_run_is_rejected() {
    let station = StationProcess::new();
    let output = station.run(&["--pressure", "100", "--manual-seconds", "86401", "--print-metrics"]);
    let text = stdout(&output);

    assert!(!output.status.success(), "{text}");
    assert!(
        text.contains("Run failed: run of 86401s exceeds the 86400s limit"),
        "{text}"
    );
    assert!(text.contains("fmm_run_failures_total 1"), "{text}");
    assert!(!station.log_dir().exists());
}
