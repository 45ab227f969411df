use std::process::Command;

fn gearclimb() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gearclimb"))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let output = gearclimb()
        .arg("--list-scenarios")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available scenarios"));
    assert!(stdout.contains("modified"));
}

#[test]
fn cli_rejects_low_starting_power() {
    let output = gearclimb()
        .args(["--starting-power", "5"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting_power (5) must be at least 10"));
}

#[test]
fn cli_rejects_target_not_above_start() {
    let output = gearclimb()
        .args(["--starting-power", "420", "--target-power", "420"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("target_power (420) must be greater than starting_power (420)"));
}

#[test]
fn cli_rejects_target_above_cap() {
    let output = gearclimb()
        .args(["--target-power", "551"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be less than or equal to power_cap (550)"));
}

#[test]
fn cli_rejects_starting_at_cap() {
    let output = gearclimb()
        .args(["--starting-power", "550", "--target-power", "550"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be less than power_cap (550)"));
}

#[test]
fn cli_json_report_is_reproducible_for_fixed_seed() {
    let run = || {
        gearclimb()
            .args([
                "--starting-power",
                "400",
                "--target-power",
                "406",
                "--runs",
                "20",
                "--seed",
                "1337",
                "--report",
                "json",
            ])
            .output()
            .expect("run cli")
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value: serde_json::Value =
        serde_json::from_slice(&first.stdout).expect("stdout is a single JSON document");
    assert_eq!(value["seed"], 1337);
    assert_eq!(value["runs"], 20);
    assert_eq!(value["scenarios"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["comparison"][0]["is_baseline"], true);
}

#[test]
fn cli_console_report_compares_against_baseline() {
    let output = gearclimb()
        .args([
            "--target-power",
            "404",
            "--runs",
            "10",
            "--seed",
            "9",
            "--sequential",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Running 10 simulations for:"));
    assert!(stdout.contains("SUMMARY - Activities needed (mean):"));
    assert!(stdout.contains("(baseline)"));
}

#[test]
fn cli_rejects_unknown_scenario() {
    let output = gearclimb()
        .args(["--scenarios", "nope", "--runs", "2"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown scenario: nope"));
}
