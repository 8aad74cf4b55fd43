use crate::model::{ActionKind, ResourceItem};
use crate::normalize::NormalizedModel;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A renderable edge between two existing items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Presentational tag only; it does not feed into risk scoring.
    pub tag: ActionKind,
}

/// Tag for a dependency edge: create wins over delete, anything else is no-op.
pub fn dependency_tag(a: ActionKind, b: ActionKind) -> ActionKind {
    if a == ActionKind::Create || b == ActionKind::Create {
        ActionKind::Create
    } else if a == ActionKind::Delete || b == ActionKind::Delete {
        ActionKind::Delete
    } else {
        ActionKind::NoOp
    }
}

/// Derives edges for the model-driven layout.
///
/// Diff mode walks each item's `deps` (edge runs dependency → dependent); architecture mode uses
/// the explicit connections. References to missing addresses are dropped without error.
pub fn derive_edges(model: &NormalizedModel) -> Vec<ModelEdge> {
    let actions: FxHashMap<&str, ActionKind> = model
        .items
        .iter()
        .map(|it| (it.address.as_str(), it.action))
        .collect();

    match &model.connections {
        Some(connections) => connections
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                let keep =
                    actions.contains_key(c.from.as_str()) && actions.contains_key(c.to.as_str());
                if !keep {
                    tracing::warn!(from = %c.from, to = %c.to, "dropping dangling connection");
                }
                keep
            })
            .map(|(idx, c)| ModelEdge {
                id: format!("e-{idx}"),
                source: c.from.clone(),
                target: c.to.clone(),
                label: c.label.clone(),
                tag: c.action.unwrap_or(ActionKind::NoOp),
            })
            .collect(),
        None => model
            .items
            .iter()
            .flat_map(|item| dependency_edges(item, &actions))
            .collect(),
    }
}

fn dependency_edges<'a>(
    item: &'a ResourceItem,
    actions: &'a FxHashMap<&str, ActionKind>,
) -> impl Iterator<Item = ModelEdge> + 'a {
    item.deps.iter().enumerate().filter_map(move |(idx, dep)| {
        let Some(dep_action) = actions.get(dep.as_str()) else {
            tracing::warn!(address = %item.address, dep = %dep, "dropping dangling dependency");
            return None;
        };
        Some(ModelEdge {
            id: format!("e-{}-{}-{}", item.address, dep, idx),
            source: dep.clone(),
            target: item.address.clone(),
            label: None,
            tag: dependency_tag(item.action, *dep_action),
        })
    })
}
