use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(rel: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(rel);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn planscope() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("planscope"));
    cmd.current_dir(repo_root()).env_remove("PLANSCOPE_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().clone();
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

fn stderr_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn analyze_prints_full_document() {
    let out = stdout_of(planscope().arg(fixture("plan/basic.json")));
    assert!(out.starts_with("# Terraform Plan Analysis\n"));
    assert!(out.contains("**Risk Score:** 40/100"));
    assert!(out.contains("```mermaid\ngraph TD\n"));
}

#[test]
fn report_reads_stdin() {
    let text = fs::read_to_string(fixture("plan/basic.json")).expect("read fixture");
    let assert = assert_cmd::Command::new(assert_cmd::cargo_bin!("planscope"))
        .args(["report", "-"])
        .write_stdin(text)
        .assert()
        .success();
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(out.starts_with("## Risk Summary\n"));
    assert!(out.contains("### Overall Risk: 🟡 MEDIUM"));
}

#[test]
fn diagram_prints_flowchart() {
    let out = stdout_of(
        planscope()
            .arg("diagram")
            .arg(fixture("architecture/basic.json")),
    );
    assert!(out.starts_with("graph TD\n"));
    assert!(out.contains("-->|http|"));
}

#[test]
fn layout_writes_json_with_config_overrides() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("planscope.json");
    fs::write(&config, r#"{ "layout": { "column_spacing": 200 } }"#).expect("write config");
    let out = tmp.path().join("layout.json");

    planscope()
        .args(["layout", "--pretty", "--config"])
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .arg(fixture("plan/basic.json"))
        .assert()
        .success();

    let layout: Value = serde_json::from_str(&fs::read_to_string(&out).expect("read out"))
        .expect("layout json");
    let subnet = layout["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .find(|n| n["id"] == "aws_subnet.public")
        .expect("subnet node");
    assert_eq!(subnet["x"], 220.0);
}

#[test]
fn apply_is_simulated() {
    let out = stdout_of(
        planscope()
            .args(["apply", "--plan-id", "plan-7", "--auto-approve"])
            .arg(fixture("plan/basic.json")),
    );
    assert!(out.contains("**Plan ID:** plan-7"));
    assert!(out.contains("terraform apply --auto-approve"));
    assert!(out.contains("Simulation successful"));
}

#[test]
fn view_reports_matches_and_selection() {
    let out = stdout_of(
        planscope()
            .arg("view")
            .arg("--svg")
            .arg(fixture("architecture/basic.svg"))
            .args(["--select", "aws_lb.front"])
            .arg(fixture("architecture/basic.json")),
    );
    let view: Value = serde_json::from_str(&out).expect("view json");

    assert_eq!(view["view_box"], serde_json::json!([0.0, 0.0, 600.0, 400.0]));
    assert_eq!(view["matches"].as_array().map(Vec::len), Some(3));
    assert_eq!(view["matches"][2]["strategy"], "text");
    assert_eq!(view["unmatched"], 1);
    // 800×600 fit of a 600×400 visual at 0.92 margin
    assert_eq!(view["zoom_percent"], 123);
    assert_eq!(view["selected"], "aws_lb.front");
    assert_eq!(view["detail"]["address"], "aws_lb.front");
}

#[test]
fn view_without_visual_fails() {
    let assert = planscope()
        .arg("view")
        .arg(fixture("plan/basic.json"))
        .assert()
        .code(1);
    assert!(stderr_of(assert).contains("No rendered visual"));
}

#[test]
fn malformed_input_exits_with_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("broken.json");
    fs::write(&input, "{ not json").expect("write input");

    let assert = planscope().arg(&input).assert().code(1);
    assert!(stderr_of(assert).contains("Invalid JSON format for Terraform plan"));
}

#[test]
fn unknown_flag_prints_usage() {
    let assert = planscope().arg("--bogus").assert().code(2);
    assert!(stderr_of(assert).contains("USAGE:"));
}
