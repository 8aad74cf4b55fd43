//! Flowchart description for plans that arrive without a pre-rendered visual.
//!
//! Resources are clustered per type; no-op items are computed but never drawn in diff mode.

use indexmap::IndexMap;
use planscope_core::{ActionKind, Analysis, ResourceItem};
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

const STYLE_ORDER: [ActionKind; 4] = [
    ActionKind::Create,
    ActionKind::Delete,
    ActionKind::Update,
    ActionKind::Replace,
];

fn action_style(action: ActionKind) -> Option<&'static str> {
    match action {
        ActionKind::Create => Some("fill:#90EE90,stroke:#2E7D32,stroke-width:2px"),
        ActionKind::Delete => {
            Some("fill:#FFB6C1,stroke:#C62828,stroke-width:2px,stroke-dasharray: 5 5")
        }
        ActionKind::Update => Some("fill:#FFEB3B,stroke:#F57F17,stroke-width:2px"),
        ActionKind::Replace => Some("fill:#E1BEE7,stroke:#6A1B9A,stroke-width:4px"),
        ActionKind::NoOp => None,
    }
}

pub fn action_icon(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Create => "✨",
        ActionKind::Delete => "🗑️",
        ActionKind::Update => "📝",
        ActionKind::Replace => "🔄",
        ActionKind::NoOp => "●",
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
}

pub fn render_diagram_description(analysis: &Analysis) -> String {
    let model = &analysis.model;
    let mut out = String::from("graph TD\n");

    let drawn: Vec<&ResourceItem> = model
        .items
        .iter()
        .filter(|it| model.is_arch_mode || it.action.is_change())
        .collect();
    if drawn.is_empty() {
        out.push_str("  Empty[\"No resource changes\"]");
        return out;
    }

    let mut by_type: IndexMap<&str, Vec<&ResourceItem>> = IndexMap::new();
    for item in &drawn {
        by_type.entry(&item.resource_type).or_default().push(*item);
    }

    let mut node_ids: FxHashMap<&str, String> = FxHashMap::default();
    let mut counter = 0usize;
    for (resource_type, items) in &by_type {
        let _ = writeln!(
            &mut out,
            "  subgraph {}[\"{}\"]",
            sanitize_id(resource_type),
            escape_label(resource_type)
        );
        for item in items {
            let node_id = format!("node{counter}");
            counter += 1;
            let _ = writeln!(
                &mut out,
                "    {node_id}[\"{} {}\"]",
                action_icon(item.action),
                escape_label(&item.name)
            );
            node_ids.insert(&item.address, node_id);
        }
        out.push_str("  end\n");
    }

    match &model.connections {
        Some(connections) => {
            for c in connections {
                let (Some(from), Some(to)) =
                    (node_ids.get(c.from.as_str()), node_ids.get(c.to.as_str()))
                else {
                    continue;
                };
                match c.label.as_deref() {
                    Some(label) if !label.is_empty() => {
                        let _ = writeln!(&mut out, "  {from} -->|{}| {to}", escape_label(label));
                    }
                    _ => {
                        let _ = writeln!(&mut out, "  {from} --> {to}");
                    }
                }
            }
        }
        None => {
            for item in &drawn {
                let Some(dependent) = node_ids.get(item.address.as_str()) else {
                    continue;
                };
                for dep in &item.deps {
                    if let Some(dependency) = node_ids.get(dep.as_str()) {
                        let _ = writeln!(&mut out, "  {dependency} --> {dependent}");
                    }
                }
            }
        }
    }

    for action in STYLE_ORDER {
        let Some(style) = action_style(action) else {
            continue;
        };
        for item in drawn.iter().filter(|it| it.action == action) {
            if let Some(node_id) = node_ids.get(item.address.as_str()) {
                let _ = writeln!(&mut out, "  style {node_id} {style}");
            }
        }
    }

    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out
}
