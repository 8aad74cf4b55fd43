#![cfg(feature = "render")]

use planscope::render::{HeadlessAnalyzer, HeadlessError, HeadlessHost, attach_view, size};
use planscope::{Analysis, ApplyRequest, Config};
use serde_json::json;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(rel: &str) -> String {
    std::fs::read_to_string(workspace_root().join("fixtures").join(rel)).expect("fixture")
}

#[test]
fn analyzer_renders_report_and_remembers_the_plan() {
    let mut analyzer = HeadlessAnalyzer::default();
    let report = analyzer.report(&fixture("plan/basic.json")).unwrap();
    assert!(report.contains("**Risk Score:** 40/100"));

    let out = analyzer
        .apply(&ApplyRequest {
            plan_id: Some("p1".to_string()),
            auto_approve: false,
        })
        .unwrap();
    assert!(out.contains("**Pending changes:** 5"));
}

#[test]
fn apply_without_analysis_is_a_parse_side_error() {
    let analyzer = HeadlessAnalyzer::default();
    let err = analyzer.apply(&ApplyRequest::default()).unwrap_err();
    assert!(matches!(err, HeadlessError::Parse(planscope::Error::NoAnalysis)));
}

#[test]
fn layout_uses_configured_spacing() {
    let mut config = Config::default();
    config.layout.column_spacing = 200.0;
    let mut analyzer = HeadlessAnalyzer::new(config);
    let layout = analyzer.layout(&fixture("plan/basic.json")).unwrap();
    assert_eq!(layout.node("aws_subnet.public").map(|n| n.x), Some(220.0));
}

#[test]
fn attach_view_uses_embedded_visual() {
    let mut payload: serde_json::Value =
        serde_json::from_str(&fixture("architecture/basic.json")).unwrap();
    payload["_server_svg"] = json!(fixture("architecture/basic.svg"));
    let config = Config::default();
    let analysis = Analysis::from_value(payload, &config).unwrap();

    let sync = attach_view(&analysis, HeadlessHost::new(), &config, size(800.0, 600.0)).unwrap();
    assert!(sync.is_attached());
    assert_eq!(sync.host().interactive_count(), 3);
}

#[test]
fn attach_view_without_visual_fails() {
    let config = Config::default();
    let analysis = Analysis::parse(&fixture("plan/basic.json"), &config).unwrap();
    let err = attach_view(&analysis, HeadlessHost::new(), &config, size(800.0, 600.0)).unwrap_err();
    assert!(matches!(err, HeadlessError::Render(_)));
}
