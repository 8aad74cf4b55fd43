//! Weighted risk scoring of a resource-change set.
//!
//! Per-item risk is `type_weight × action_weight`. The total is normalized against
//! `item_count × max_type_weight × max_action_weight`, using the global maxima rather than the
//! weights of the types actually present, so mixed plans rarely approach 100.

use crate::config::RiskConfig;
use crate::model::{ActionKind, ResourceItem};
use rustc_hash::FxHashSet;
use serde::Serialize;

pub const MAX_ACTION_WEIGHT: u32 = 10;
pub const HIGH_THRESHOLD: u8 = 70;
pub const MEDIUM_THRESHOLD: u8 = 40;

/// Anything the scorer can weigh: a resource type, a classified action, and an address to
/// report when the item is flagged.
pub trait RiskSubject {
    fn address(&self) -> &str;
    fn resource_type(&self) -> &str;
    fn action(&self) -> ActionKind;
}

impl RiskSubject for ResourceItem {
    fn address(&self) -> &str {
        &self.address
    }

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn action(&self) -> ActionKind {
        self.action
    }
}

/// Action multiplier; `None` for no-op, which is excluded from scoring entirely.
pub fn action_weight(action: ActionKind) -> Option<u32> {
    match action {
        ActionKind::Delete => Some(10),
        ActionKind::Replace => Some(8),
        ActionKind::Update => Some(3),
        ActionKind::Create => Some(1),
        ActionKind::NoOp => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlagReason {
    #[serde(rename = "Critical resource deletion")]
    CriticalDeletion,
    #[serde(rename = "Resource will be replaced (recreated)")]
    Replacement,
    #[serde(rename = "Security-sensitive resource modification")]
    SecuritySensitive,
}

impl FlagReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagReason::CriticalDeletion => "Critical resource deletion",
            FlagReason::Replacement => "Resource will be replaced (recreated)",
            FlagReason::SecuritySensitive => "Security-sensitive resource modification",
        }
    }
}

impl std::fmt::Display for FlagReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlaggedItem {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub reason: FlagReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub flagged_items: Vec<FlaggedItem>,
}

impl RiskAssessment {
    pub fn empty() -> Self {
        Self {
            score: 0,
            level: RiskLevel::Low,
            flagged_items: Vec::new(),
        }
    }
}

/// Scores a change set. Pure: the result depends only on `changes` and `config`.
pub fn score<T: RiskSubject>(changes: &[T], config: &RiskConfig) -> RiskAssessment {
    let mut total: u64 = 0;
    let mut scored: u64 = 0;
    for change in changes {
        let Some(aw) = action_weight(change.action()) else {
            continue;
        };
        total += u64::from(config.type_weight(change.resource_type())) * u64::from(aw);
        scored += 1;
    }

    let score = if scored == 0 {
        0
    } else {
        let max_possible =
            scored * u64::from(config.max_type_weight()) * u64::from(MAX_ACTION_WEIGHT);
        let ratio = (total as f64 / max_possible as f64 * 100.0).min(100.0);
        ratio.round() as u8
    };

    let flagged_items = flag(changes, config);
    tracing::debug!(score, scored, flagged = flagged_items.len(), "scored change set");

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        flagged_items,
    }
}

/// Per-item high-risk flags, independent of the score. First matching reason wins and an
/// address is reported at most once, in input order.
pub fn flag<T: RiskSubject>(changes: &[T], config: &RiskConfig) -> Vec<FlaggedItem> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    changes
        .iter()
        .filter_map(|change| {
            if seen.contains(change.address()) {
                return None;
            }
            let reason = flag_reason(change, config)?;
            seen.insert(change.address());
            Some(FlaggedItem {
                address: change.address().to_string(),
                resource_type: change.resource_type().to_string(),
                reason,
            })
        })
        .collect()
}

fn flag_reason<T: RiskSubject>(change: &T, config: &RiskConfig) -> Option<FlagReason> {
    let action = change.action();
    let resource_type = change.resource_type();

    if action.includes_delete() && config.type_weight(resource_type) >= config.flag_type_weight {
        return Some(FlagReason::CriticalDeletion);
    }
    if action == ActionKind::Replace {
        return Some(FlagReason::Replacement);
    }
    let security = config
        .security_markers
        .iter()
        .any(|m| resource_type.contains(m.as_str()));
    if security && matches!(action, ActionKind::Update | ActionKind::Delete) {
        return Some(FlagReason::SecuritySensitive);
    }
    None
}
