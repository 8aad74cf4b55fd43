//! Markdown reports for analysis, risk and (simulated) apply results.

use crate::Result;
use crate::diagram::render_diagram_description;
use planscope_core::{
    ActionCounts, ActionKind, Analysis, ApplyOutcome, ApplyRequest, Config, RiskAssessment,
    RiskLevel,
};

fn level_marker(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "🔴",
        RiskLevel::Medium => "🟡",
        RiskLevel::Low => "🟢",
    }
}

fn count_heading(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Create => "✨ **Create:**",
        ActionKind::Update => "📝 **Update:**",
        ActionKind::Delete => "🗑️ **Delete:**",
        ActionKind::Replace => "🔄 **Replace:**",
        ActionKind::NoOp => "● **No-op:**",
    }
}

fn recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::High => &[
            "⚠️ **Review carefully** before applying changes",
            "🔍 Verify all resource dependencies",
            "💾 Ensure backups are in place",
            "👥 Consider peer review for critical changes",
        ],
        RiskLevel::Medium => &[
            "✅ Changes appear moderate - review before applying",
            "🔍 Verify critical resource configurations",
        ],
        RiskLevel::Low => &[
            "✅ Changes appear low-risk",
            "📋 Standard review recommended",
        ],
    }
}

pub fn render_risk_report(analysis: &Analysis, risk: &RiskAssessment) -> String {
    let counts = &analysis.model.counts;
    if counts.total() == 0 {
        return "## Risk Summary\n\n✅ **No changes detected** - No infrastructure modifications planned."
            .to_string();
    }

    let mut lines = vec![
        "## Risk Summary".to_string(),
        String::new(),
        format!(
            "### Overall Risk: {} {}",
            level_marker(risk.level),
            risk.level
        ),
        format!("**Risk Score:** {}/100", risk.score),
        String::new(),
        "### Changes".to_string(),
        String::new(),
    ];

    for (action, n) in counts.ordered() {
        if n == 0 {
            continue;
        }
        let plural = if n > 1 { "s" } else { "" };
        lines.push(format!("- {} {n} resource{plural}", count_heading(action)));
    }
    lines.push(String::new());

    if !risk.flagged_items.is_empty() {
        lines.push("### ⚠️ High-Risk Changes".to_string());
        lines.push(String::new());
        for f in &risk.flagged_items {
            lines.push(format!(
                "- **{}** ({}): {}",
                f.address, f.resource_type, f.reason
            ));
        }
        lines.push(String::new());
    }

    lines.push("### Recommendations".to_string());
    lines.push(String::new());
    for r in recommendations(risk.level) {
        lines.push(format!("- {r}"));
    }

    lines.join("\n")
}

/// All four counts, always in create/update/delete/replace order.
pub fn render_change_summary(counts: &ActionCounts) -> String {
    let mut lines = vec!["## Change Summary".to_string(), String::new()];
    for (action, n) in counts.ordered() {
        let heading = count_heading(action).replace("**", "");
        lines.push(format!("- {heading} {n}"));
    }
    lines.join("\n")
}

pub fn render_analysis(analysis: &Analysis, risk: &RiskAssessment) -> String {
    let lines = [
        "# Terraform Plan Analysis".to_string(),
        String::new(),
        format!("_{}: {}_", analysis.title(), analysis.subtitle()),
        String::new(),
        render_change_summary(&analysis.model.counts),
        String::new(),
        render_risk_report(analysis, risk),
        String::new(),
        "## Infrastructure Change Visualization".to_string(),
        String::new(),
        "```mermaid".to_string(),
        render_diagram_description(analysis),
        "```".to_string(),
        String::new(),
        "---".to_string(),
        String::new(),
        "## Next Steps".to_string(),
        String::new(),
        "To apply these changes, run `planscope apply` in the same session.".to_string(),
        String::new(),
        "**⚠️ Note:** This is a simulation. No `terraform apply` is ever executed.".to_string(),
    ];
    lines.join("\n")
}

/// Parses `text` and renders the full analysis document in one step.
pub fn render_plan(text: &str, config: &Config) -> Result<String> {
    let analysis = Analysis::parse(text, config)?;
    Ok(render_analysis(&analysis, &analysis.risk))
}

pub fn render_apply_report(request: &ApplyRequest, outcome: &ApplyOutcome) -> String {
    let mut lines = vec![
        "# Terraform Apply Simulation".to_string(),
        String::new(),
        format!("**Plan ID:** {}", outcome.plan_id),
        format!("**Command:** {}", outcome.command),
        format!("**Pending changes:** {}", outcome.pending_changes),
        String::new(),
        "## Status".to_string(),
        String::new(),
        "✅ **Simulation successful**".to_string(),
        String::new(),
        "⚠️ **Note:** This is a simulated execution. In a production environment, this would:"
            .to_string(),
        "1. Validate the plan".to_string(),
        "2. Execute terraform apply with the provided options".to_string(),
        "3. Stream the output in real-time".to_string(),
        "4. Report the final status".to_string(),
    ];
    if !request.auto_approve {
        lines.push(String::new());
        lines.push("Interactive approval would be requested before any change.".to_string());
    }
    lines.extend(
        [
            "",
            "## Safety Considerations",
            "",
            "For production use, implement:",
            "- Authentication and authorization",
            "- Approval workflows",
            "- State locking",
            "- Rollback mechanisms",
            "- Audit logging",
        ]
        .map(String::from),
    );
    lines.join("\n")
}
