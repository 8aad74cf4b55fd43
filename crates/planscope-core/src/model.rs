//! Unified resource/edge model shared by diff-mode and architecture-mode inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of a pending change to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Delete,
    Update,
    Replace,
    #[default]
    #[serde(rename = "no-op")]
    NoOp,
}

impl ActionKind {
    pub const CHANGES: [ActionKind; 4] = [
        ActionKind::Create,
        ActionKind::Update,
        ActionKind::Delete,
        ActionKind::Replace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Delete => "delete",
            ActionKind::Update => "update",
            ActionKind::Replace => "replace",
            ActionKind::NoOp => "no-op",
        }
    }

    pub fn is_change(self) -> bool {
        self != ActionKind::NoOp
    }

    /// A replace is a delete followed by a create, so it counts as removing the old object.
    pub fn includes_delete(self) -> bool {
        matches!(self, ActionKind::Delete | ActionKind::Replace)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One infrastructure resource under consideration.
///
/// `address` is the only field used for cross-referencing (edges, selection, visual matching);
/// `name` and `resource_type` may collide across items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub action: ActionKind,
    pub before: Option<Value>,
    pub after: Option<Value>,
    #[serde(default)]
    pub deps: Vec<String>,
}

/// An explicit edge in architecture mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub replace: usize,
}

impl ActionCounts {
    /// Increments the bucket for `action`; no-op is never counted.
    pub fn record(&mut self, action: ActionKind) {
        match action {
            ActionKind::Create => self.create += 1,
            ActionKind::Update => self.update += 1,
            ActionKind::Delete => self.delete += 1,
            ActionKind::Replace => self.replace += 1,
            ActionKind::NoOp => {}
        }
    }

    pub fn get(&self, action: ActionKind) -> usize {
        match action {
            ActionKind::Create => self.create,
            ActionKind::Update => self.update,
            ActionKind::Delete => self.delete,
            ActionKind::Replace => self.replace,
            ActionKind::NoOp => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.create + self.update + self.delete + self.replace
    }

    /// Counts in the fixed presentation order: create, update, delete, replace.
    pub fn ordered(&self) -> [(ActionKind, usize); 4] {
        ActionKind::CHANGES.map(|a| (a, self.get(a)))
    }
}
