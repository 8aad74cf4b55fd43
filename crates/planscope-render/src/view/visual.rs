use crate::geom::{Rect, Size, point, size};
use crate::{Error, Result};
use planscope_core::ViewConfig;
use serde::Serialize;
use std::str::FromStr;

/// Position of a candidate node group in document order. Stable for one parsed visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `<g class="node ...">` group of the visual, reduced to what matching needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualElement {
    pub id: ElementId,
    pub dom_id: Option<String>,
    /// `data-address` attribute, else the text of a direct `<title>` child.
    pub identifier: Option<String>,
    /// Text content of every descendant `<text>`, trimmed, in document order.
    pub texts: Vec<String>,
}

/// A parsed, externally supplied SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedVisual {
    markup: String,
    view_box: Rect,
    elements: Vec<VisualElement>,
}

fn class_has_token(class: Option<&str>, token: &str) -> bool {
    class
        .unwrap_or_default()
        .split_whitespace()
        .any(|t| t == token)
}

fn parse_length(value: Option<&str>) -> Option<f64> {
    let len = svgtypes::Length::from_str(value?.trim()).ok()?;
    if len.unit == svgtypes::LengthUnit::Percent || !len.number.is_finite() || len.number <= 0.0 {
        return None;
    }
    Some(len.number)
}

fn text_of(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn element_of(idx: usize, g: roxmltree::Node<'_, '_>) -> VisualElement {
    let identifier = g
        .attribute("data-address")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            g.children()
                .find(|c| c.is_element() && c.tag_name().name() == "title")
                .map(text_of)
                .filter(|s| !s.is_empty())
        });

    let texts = g
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "text")
        .map(text_of)
        .collect();

    VisualElement {
        id: ElementId(idx),
        dom_id: g.attribute("id").map(str::to_string),
        identifier,
        texts,
    }
}

impl RenderedVisual {
    pub fn parse(markup: &str, config: &ViewConfig) -> Result<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(markup, opts)
            .map_err(|e| Error::visual(format!("failed to parse svg xml: {e}")))?;

        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(Error::visual(format!(
                "expected <svg> root element, found <{}>",
                root.tag_name().name()
            )));
        }

        let view_box = match root
            .attribute("viewBox")
            .and_then(|v| svgtypes::ViewBox::from_str(v).ok())
            .filter(|vb| vb.w > 0.0 && vb.h > 0.0)
        {
            Some(vb) => Rect::new(point(vb.x, vb.y), size(vb.w, vb.h)),
            None => {
                let w = parse_length(root.attribute("width")).unwrap_or(config.default_width);
                let h = parse_length(root.attribute("height")).unwrap_or(config.default_height);
                tracing::debug!(w, h, "visual has no usable viewBox; using width/height");
                Rect::new(point(0.0, 0.0), size(w, h))
            }
        };

        let elements: Vec<VisualElement> = root
            .descendants()
            .filter(|n| {
                n.is_element()
                    && n.tag_name().name() == "g"
                    && class_has_token(n.attribute("class"), "node")
            })
            .enumerate()
            .map(|(idx, g)| element_of(idx, g))
            .collect();

        tracing::debug!(elements = elements.len(), "parsed rendered visual");
        Ok(Self {
            markup: markup.to_string(),
            view_box,
            elements,
        })
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Intrinsic size used for fitting.
    pub fn content_size(&self) -> Size {
        self.view_box.size
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&VisualElement> {
        self.elements.get(id.0)
    }
}
