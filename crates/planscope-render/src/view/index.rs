use super::visual::{ElementId, RenderedVisual};
use indexmap::IndexMap;
use planscope_core::ResourceItem;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// The element's identifier equals an item address.
    Identifier,
    /// Visible text equals an item name or occurs in an item address.
    Text,
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[[+\-~*]\]\s*").expect("valid regex"))
}

/// Drops a leading `[+]`/`[-]`/`[~]`/`[*]` change marker.
pub fn strip_marker(text: &str) -> &str {
    let text = text.trim();
    match marker_re().find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text,
    }
}

/// Address ↔ element lookup for one attached visual.
///
/// Rebuilt wholesale on every (re)attach; never patched in place. Every matched element is
/// interactive. When several elements resolve to the same address, [`element_for`] returns the
/// first one in document order; a click still highlights the element that was clicked.
///
/// [`element_for`]: Self::element_for
#[derive(Debug, Clone, Default)]
pub struct AddressIndex {
    by_address: IndexMap<String, ElementId>,
    by_element: FxHashMap<ElementId, (String, MatchStrategy)>,
}

impl AddressIndex {
    pub fn build(visual: &RenderedVisual, items: &[ResourceItem]) -> Self {
        let addresses: FxHashSet<&str> = items.iter().map(|it| it.address.as_str()).collect();
        let mut index = Self::default();
        let mut unmatched = 0usize;

        for element in visual.elements() {
            let primary = element
                .identifier
                .as_deref()
                .filter(|id| addresses.contains(id))
                .map(|id| (id.to_string(), MatchStrategy::Identifier));

            let matched = primary.or_else(|| {
                element.texts.iter().find_map(|raw| {
                    let text = strip_marker(raw);
                    if text.is_empty() {
                        return None;
                    }
                    items
                        .iter()
                        .find(|it| it.name == text || it.address.contains(text))
                        .map(|it| (it.address.clone(), MatchStrategy::Text))
                })
            });

            let Some((address, strategy)) = matched else {
                unmatched += 1;
                tracing::trace!(element = %element.id, "visual element left non-interactive");
                continue;
            };
            tracing::debug!(element = %element.id, %address, ?strategy, "matched visual element");
            index.by_address.entry(address.clone()).or_insert(element.id);
            index.by_element.insert(element.id, (address, strategy));
        }

        if unmatched > 0 {
            tracing::warn!(
                unmatched,
                matched = index.by_element.len(),
                "some visual elements could not be resolved to a resource"
            );
        }
        index
    }

    /// Number of interactive elements.
    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }

    pub fn element_for(&self, address: &str) -> Option<ElementId> {
        self.by_address.get(address).copied()
    }

    pub fn address_for(&self, element: ElementId) -> Option<&str> {
        self.by_element.get(&element).map(|(a, _)| a.as_str())
    }

    pub fn strategy_for(&self, element: ElementId) -> Option<MatchStrategy> {
        self.by_element.get(&element).map(|(_, s)| *s)
    }

    pub fn is_interactive(&self, element: ElementId) -> bool {
        self.by_element.contains_key(&element)
    }

    pub fn contains_address(&self, address: &str) -> bool {
        self.by_address.contains_key(address)
    }

    /// Interactive elements in document order.
    pub fn interactive_elements(&self) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = self.by_element.keys().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.by_address.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_change_markers() {
        assert_eq!(strip_marker("[+] web"), "web");
        assert_eq!(strip_marker("  [~]db "), "db");
        assert_eq!(strip_marker("[x] web"), "[x] web");
        assert_eq!(strip_marker("[*]"), "");
    }
}
