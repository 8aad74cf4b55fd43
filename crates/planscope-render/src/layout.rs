//! Model-driven layout: used when a plan carries no pre-rendered visual.
//!
//! One row per (provider, category) bucket. A label node sits at the row origin and the members
//! follow left to right below it. Coordinates are node anchors; sizing is left to the host.

use crate::geom::{Box2D, Point, point};
use planscope_core::{ActionKind, Analysis, LayoutConfig, ModelEdge, ResourceGroup};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutNodeKind {
    GroupLabel,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub kind: LayoutNodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub action: ActionKind,
}

impl LayoutNode {
    pub fn anchor(&self) -> Point {
        point(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub tag: ActionKind,
    pub color: &'static str,
    pub dashed: bool,
    pub animated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl From<Box2D> for Bounds {
    fn from(b: Box2D) -> Self {
        Self {
            min_x: b.min.x,
            min_y: b.min.y,
            max_x: b.max.x,
            max_y: b.max.y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl ModelLayout {
    /// Bounding box of all node anchors, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(Box2D::from_points(self.nodes.iter().map(LayoutNode::anchor)).into())
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn edge_color(tag: ActionKind) -> &'static str {
    match tag {
        ActionKind::Create => "rgba(76,175,80,.7)",
        ActionKind::Delete => "rgba(244,67,54,.7)",
        _ => "rgba(130,160,255,.4)",
    }
}

pub fn layout_groups(
    groups: &[ResourceGroup<'_>],
    edges: &[ModelEdge],
    config: &LayoutConfig,
) -> ModelLayout {
    let mut nodes = Vec::new();
    let mut y = 0.0_f64;

    for group in groups {
        nodes.push(LayoutNode {
            id: format!("group-{}-{}", group.category.as_str(), y),
            kind: LayoutNodeKind::GroupLabel,
            label: group.category.label().to_string(),
            x: config.label_x,
            y,
            resource_type: None,
            action: ActionKind::NoOp,
        });
        for (i, item) in group.items.iter().enumerate() {
            nodes.push(LayoutNode {
                id: item.address.clone(),
                kind: LayoutNodeKind::Resource,
                label: item.name.clone(),
                x: config.origin_x + i as f64 * config.column_spacing,
                y: y + config.label_offset_y,
                resource_type: Some(item.resource_type.clone()),
                action: item.action,
            });
        }
        y += config.row_spacing;
    }

    let edges = edges
        .iter()
        .map(|e| LayoutEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            label: e.label.clone(),
            tag: e.tag,
            color: edge_color(e.tag),
            dashed: e.tag == ActionKind::NoOp,
            animated: e.tag != ActionKind::NoOp,
        })
        .collect();

    tracing::debug!(nodes = nodes.len(), rows = groups.len(), "model layout built");
    ModelLayout { nodes, edges }
}

pub fn layout_analysis(analysis: &Analysis, config: &LayoutConfig) -> ModelLayout {
    layout_groups(&analysis.groups(), &analysis.edges(), config)
}
