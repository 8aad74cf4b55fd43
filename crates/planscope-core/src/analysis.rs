use crate::config::Config;
use crate::edges::{ModelEdge, derive_edges};
use crate::group::{ResourceGroup, group};
use crate::input::{PlanEnvelope, PlanInput, parse_payload};
use crate::normalize::{NormalizedModel, normalize};
use crate::risk::{RiskAssessment, score};
use crate::{Error, Result};

/// One complete analysis: the raw envelope, its unified model, and the derived risk report.
///
/// Nothing here is persisted; a new analysis is computed from scratch for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub envelope: PlanEnvelope,
    pub model: NormalizedModel,
    pub risk: RiskAssessment,
}

impl Analysis {
    pub fn from_envelope(envelope: PlanEnvelope, config: &Config) -> Self {
        let model = normalize(&envelope.input);
        let risk = score(&model.items, &config.risk);
        tracing::info!(
            architecture = model.is_arch_mode,
            items = model.items.len(),
            score = risk.score,
            level = %risk.level,
            "analysis complete"
        );
        Self {
            envelope,
            model,
            risk,
        }
    }

    pub fn parse(text: &str, config: &Config) -> Result<Self> {
        Ok(Self::from_envelope(parse_payload(text)?, config))
    }

    pub fn from_value(value: serde_json::Value, config: &Config) -> Result<Self> {
        Ok(Self::from_envelope(PlanEnvelope::from_value(value)?, config))
    }

    pub fn is_architecture(&self) -> bool {
        self.model.is_arch_mode
    }

    pub fn server_svg(&self) -> Option<&str> {
        self.envelope.server_svg.as_deref()
    }

    pub fn terraform_version(&self) -> Option<&str> {
        match &self.envelope.input {
            PlanInput::Diff(diff) => diff.terraform_version.as_deref(),
            PlanInput::Architecture(_) => None,
        }
    }

    pub fn title(&self) -> String {
        match &self.envelope.input {
            PlanInput::Architecture(arch) => arch
                .title
                .clone()
                .unwrap_or_else(|| "Cloud Architecture".to_string()),
            PlanInput::Diff(_) => "Cloud Architecture Diff".to_string(),
        }
    }

    pub fn subtitle(&self) -> String {
        let n = self.model.items.len();
        if self.is_architecture() {
            format!("{n} resources")
        } else {
            format!(
                "Terraform — {n} resources — v{}",
                self.terraform_version().unwrap_or("?")
            )
        }
    }

    pub fn edges(&self) -> Vec<ModelEdge> {
        derive_edges(&self.model)
    }

    pub fn groups(&self) -> Vec<ResourceGroup<'_>> {
        group(&self.model.items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyRequest {
    pub plan_id: Option<String>,
    pub auto_approve: bool,
}

/// Result of an apply request. Always simulated: no infrastructure operation is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub plan_id: String,
    pub command: String,
    pub simulated: bool,
    pub pending_changes: usize,
}

/// Holds the last analysis so a later apply step can refer to it.
///
/// Constructed explicitly per caller; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: Config,
    last: Option<Analysis>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, last: None }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses and analyzes `text`. On a parse error the previous analysis is kept.
    pub fn analyze(&mut self, text: &str) -> Result<&Analysis> {
        let analysis = Analysis::parse(text, &self.config)?;
        Ok(&*self.last.insert(analysis))
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last.as_ref()
    }

    pub fn apply(&self, request: &ApplyRequest) -> Result<ApplyOutcome> {
        let analysis = self.last.as_ref().ok_or(Error::NoAnalysis)?;
        let plan_id = request
            .plan_id
            .clone()
            .unwrap_or_else(|| format!("plan-{}", chrono::Utc::now().timestamp_millis()));
        let command = if request.auto_approve {
            "terraform apply --auto-approve".to_string()
        } else {
            "terraform apply".to_string()
        };
        tracing::info!(%plan_id, %command, "simulated apply");
        Ok(ApplyOutcome {
            plan_id,
            command,
            simulated: true,
            pending_changes: analysis.model.counts.total(),
        })
    }
}
