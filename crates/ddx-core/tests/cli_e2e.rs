//! End-to-end tests for the `ddx` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A `ddx` command isolated from the caller's config and environment.
fn ddx(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ddx").expect("ddx binary");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("DDX_TABLE")
        .env_remove("DDX_GRAPH")
        .env_remove("DDX_CONFIG_DIR")
        .env_remove("DDX_LOG_FORMAT")
        .env_remove("DDX_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn diagnose_json_ranks_uti_first() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home)
        .args([
            "diagnose",
            "--present",
            "Painful Urination",
            "--absent",
            "Fatigue,Fever",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output);
    let top = report["top_diagnoses"].as_array().unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0]["disease"], "UTI");
    assert_eq!(report["observed"].as_array().unwrap().len(), 3);
    assert!(report["next_question"].as_str().unwrap().ends_with('?'));
}

#[test]
fn diagnose_with_no_answers_reports_priors() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home).args(["diagnose", "--top", "13"]).output().unwrap();
    assert!(output.status.success());

    let report = stdout_json(&output);
    let total: f64 = report["top_diagnoses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["probability"].as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn diagnose_markdown_and_summary() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["-f", "md", "diagnose", "-p", "Fever,Cough"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### Next Question"))
        .stdout(predicate::str::contains("Respiratory"));

    ddx(&home)
        .args(["--format", "summary", "diagnose", "-p", "Fever"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 observation(s), leading"));
}

#[test]
fn unknown_symptom_is_an_argument_error() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["diagnose", "-p", "Glowing Skin"])
        .assert()
        .code(10)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Glowing Skin"));
}

#[test]
fn explain_named_disease() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home)
        .args(["explain", "Migraine", "-p", "Headache", "-a", "Fever"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record = stdout_json(&output);
    assert_eq!(record["disease"], "Migraine");
    assert_eq!(record["evidence_factors"].as_array().unwrap().len(), 2);
    assert!(record["posterior_probability"].as_f64().unwrap() > 0.09);
}

#[test]
fn explain_defaults_to_leader() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["-f", "md", "explain", "-p", "Painful Urination,Frequent Urination"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UTI"));
}

#[test]
fn explain_unknown_disease_fails() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["explain", "Dragon Pox"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Dragon Pox"));
}

#[test]
fn systems_assessment_json() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home)
        .args([
            "systems",
            "Headache",
            "Dizziness",
            "--lifestyle",
            "Sleep=wakes at 3am",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let assessment = stdout_json(&output);
    let affected = assessment["affected_systems"].as_array().unwrap();
    assert_eq!(affected[0]["system"], "Neurological");
    assert_eq!(affected[0]["score"].as_f64().unwrap(), 1.0);
    assert!(!assessment["lifestyle_links"].as_array().unwrap().is_empty());

    let questions = assessment["suggested_questions"].as_array().unwrap();
    assert!(questions.len() <= 5);
    assert!(questions.iter().all(|q| q != "Headache" && q != "Dizziness"));
}

#[test]
fn systems_markdown_and_bad_lifestyle() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["-f", "md", "systems", "Fatigue", "Insomnia"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("## Body Systems Assessment"));

    ddx(&home)
        .args(["systems", "Fatigue", "--lifestyle", "no equals sign"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FACTOR=TEXT"));
}

#[test]
fn config_show_and_validate_defaults() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home).args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let shown = stdout_json(&output);
    assert_eq!(shown["diseases"].as_array().unwrap().len(), 13);
    assert_eq!(shown["systems"].as_array().unwrap().len(), 12);

    ddx(&home)
        .args(["-f", "summary", "config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("config validate: OK"));
}

#[test]
fn config_validate_rejects_bad_table() {
    let home = TempDir::new().unwrap();
    let table = home.path().join("table.json");
    std::fs::write(&table, "{ \"schema_version\": \"1.0.0\", \"diseases\": [").unwrap();

    ddx(&home)
        .args(["config", "validate", "--table"])
        .arg(&table)
        .assert()
        .code(11);
}

#[test]
fn out_of_range_likelihood_is_an_invalid_table() {
    let home = TempDir::new().unwrap();
    let table = home.path().join("table.json");
    std::fs::write(
        &table,
        r#"{
            "schema_version": "1.0.0",
            "diseases": ["Flu"],
            "priors": {"Flu": 1.0},
            "symptom_given_disease": {"Fever": {"Flu": 1.4}}
        }"#,
    )
    .unwrap();

    ddx(&home)
        .args(["config", "validate", "--table"])
        .arg(&table)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("\"code\":11"))
        .stderr(predicate::str::contains("reset_config"));
}

#[test]
fn debug_logs_carry_command_stage() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["-vv", "--log-format", "jsonl", "explain", "-p", "Headache"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"stage\":\"explain\""));

    ddx(&home)
        .args(["-vv", "--log-format", "jsonl", "systems", "Headache"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"stage\":\"systems\""));
}

#[test]
fn missing_table_file_is_a_config_error() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["diagnose", "--table", "/nonexistent/ddx/table.json"])
        .assert()
        .code(11);
}

#[test]
fn schema_default_and_listing() {
    let home = TempDir::new().unwrap();
    let output = ddx(&home).arg("schema").output().unwrap();
    assert!(output.status.success());
    let schema = stdout_json(&output);
    assert_eq!(schema["title"], "SessionReport");

    ddx(&home)
        .args(["-f", "md", "schema", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ProbabilityTable"))
        .stdout(predicate::str::contains("HolisticAssessment"));

    ddx(&home).args(["schema", "NoSuchType"]).assert().code(11);
}

#[test]
fn version_and_completions() {
    let home = TempDir::new().unwrap();
    ddx(&home)
        .args(["-f", "md", "version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ddx "));

    ddx(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ddx"));
}

#[test]
fn unknown_subcommand_fails() {
    let home = TempDir::new().unwrap();
    ddx(&home).arg("frobnicate").assert().failure();
}
