use super::transform::ViewTransform;
use super::visual::ElementId;
use rustc_hash::FxHashSet;

/// The rendering surface a [`super::ViewSynchronizer`] drives.
///
/// Implementations only reflect what they are told; they own no selection or transform logic.
pub trait ViewHost {
    /// Inserts the visual's markup, replacing whatever was shown before.
    fn mount(&mut self, markup: &str);
    fn set_interactive(&mut self, element: ElementId, interactive: bool);
    fn set_highlight(&mut self, element: ElementId, highlighted: bool);
    fn apply_transform(&mut self, transform: &ViewTransform);
    /// Removes the mounted visual and everything attached to it.
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Mount,
    SetInteractive(ElementId, bool),
    SetHighlight(ElementId, bool),
    ApplyTransform(ViewTransform),
    Clear,
}

/// In-memory host that records every call and tracks the resulting surface state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    calls: Vec<HostCall>,
    markup: Option<String>,
    interactive: FxHashSet<ElementId>,
    highlighted: FxHashSet<ElementId>,
    transform: Option<ViewTransform>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    pub fn is_interactive(&self, element: ElementId) -> bool {
        self.interactive.contains(&element)
    }

    pub fn interactive_count(&self) -> usize {
        self.interactive.len()
    }

    pub fn highlighted(&self) -> Vec<ElementId> {
        let mut out: Vec<_> = self.highlighted.iter().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn transform(&self) -> Option<ViewTransform> {
        self.transform
    }
}

impl ViewHost for HeadlessHost {
    fn mount(&mut self, markup: &str) {
        self.calls.push(HostCall::Mount);
        self.markup = Some(markup.to_string());
        self.interactive.clear();
        self.highlighted.clear();
    }

    fn set_interactive(&mut self, element: ElementId, interactive: bool) {
        self.calls.push(HostCall::SetInteractive(element, interactive));
        if interactive {
            self.interactive.insert(element);
        } else {
            self.interactive.remove(&element);
        }
    }

    fn set_highlight(&mut self, element: ElementId, highlighted: bool) {
        self.calls.push(HostCall::SetHighlight(element, highlighted));
        if highlighted {
            self.highlighted.insert(element);
        } else {
            self.highlighted.remove(&element);
        }
    }

    fn apply_transform(&mut self, transform: &ViewTransform) {
        self.calls.push(HostCall::ApplyTransform(*transform));
        self.transform = Some(*transform);
    }

    fn clear(&mut self) {
        self.calls.push(HostCall::Clear);
        self.markup = None;
        self.interactive.clear();
        self.highlighted.clear();
        self.transform = None;
    }
}
