use crate::classify::classify;
use crate::input::{ArchitecturePayload, DiffPayload, PlanInput};
use crate::model::{ActionCounts, ActionKind, Connection, ResourceItem};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// The unified item/edge model produced from either input shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModel {
    pub items: Vec<ResourceItem>,
    /// Explicit edges (architecture mode only). Diff mode derives edges from `deps` instead.
    pub connections: Option<Vec<Connection>>,
    pub counts: ActionCounts,
    pub is_arch_mode: bool,
}

impl NormalizedModel {
    pub fn item(&self, address: &str) -> Option<&ResourceItem> {
        self.items.iter().find(|it| it.address == address)
    }
}

/// Converts either input shape into the unified model.
///
/// Addresses are not validated here; dangling `deps` and connections are carried through and
/// filtered by the consumers that draw edges.
pub fn normalize(input: &PlanInput) -> NormalizedModel {
    match input {
        PlanInput::Diff(diff) => normalize_diff(diff),
        PlanInput::Architecture(arch) => normalize_architecture(arch),
    }
}

fn normalize_diff(diff: &DiffPayload) -> NormalizedModel {
    let dep_map: FxHashMap<&str, &[String]> = diff
        .configuration
        .as_ref()
        .and_then(|c| c.root_module.as_ref())
        .map(|m| {
            m.resources
                .iter()
                .map(|r| (r.address.as_str(), r.depends_on.as_deref().unwrap_or(&[])))
                .collect()
        })
        .unwrap_or_default();

    let mut counts = ActionCounts::default();
    let items = diff
        .resource_changes
        .iter()
        .map(|rc| {
            let action = classify(&rc.change.actions);
            counts.record(action);
            tracing::trace!(
                address = %rc.address,
                actions = ?rc.change.actions,
                %action,
                "classified change"
            );
            ResourceItem {
                address: rc.address.clone(),
                resource_type: rc.resource_type.clone(),
                name: rc.name.clone(),
                action,
                before: rc.change.before.clone(),
                after: rc.change.after.clone(),
                deps: dep_map
                    .get(rc.address.as_str())
                    .map(|deps| deps.to_vec())
                    .unwrap_or_default(),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        items = items.len(),
        create = counts.create,
        update = counts.update,
        delete = counts.delete,
        replace = counts.replace,
        "normalized diff payload"
    );

    NormalizedModel {
        items,
        connections: None,
        counts,
        is_arch_mode: false,
    }
}

fn normalize_architecture(arch: &ArchitecturePayload) -> NormalizedModel {
    let items = arch
        .resources
        .iter()
        .map(|r| ResourceItem {
            address: r.address.clone(),
            resource_type: r.resource_type.clone(),
            name: r.name.clone().unwrap_or_else(|| r.address.clone()),
            action: ActionKind::NoOp,
            before: None,
            after: r.config.clone(),
            deps: Vec::new(),
        })
        .collect::<Vec<_>>();
    let connections = arch.connections.clone().unwrap_or_default();

    tracing::debug!(
        items = items.len(),
        connections = connections.len(),
        "normalized architecture payload"
    );

    NormalizedModel {
        items,
        connections: Some(connections),
        counts: ActionCounts::default(),
        is_arch_mode: true,
    }
}
