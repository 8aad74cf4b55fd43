use super::host::ViewHost;
use super::index::AddressIndex;
use super::input::{InputAdapter, PointerInput};
use super::state::{Scene, ViewEvent, ViewState};
use super::transform::ViewTransform;
use super::visual::{ElementId, RenderedVisual};
use crate::geom::Size;
use crate::{Error, Result};
use planscope_core::{Analysis, ResourceItem, ViewConfig};

#[derive(Debug)]
struct Attachment {
    visual: RenderedVisual,
    items: Vec<ResourceItem>,
    index: AddressIndex,
}

/// Keeps a host surface showing a pre-rendered visual in step with the resource model.
///
/// `Unattached` until [`attach`](Self::attach); events received while unattached are ignored.
#[derive(Debug)]
pub struct ViewSynchronizer<H: ViewHost> {
    host: H,
    config: ViewConfig,
    viewport: Size,
    attached: Option<Attachment>,
    state: ViewState,
    highlighted: Option<ElementId>,
}

impl<H: ViewHost> ViewSynchronizer<H> {
    pub fn new(host: H, config: ViewConfig, viewport: Size) -> Self {
        Self {
            host,
            config,
            viewport,
            attached: None,
            state: ViewState::default(),
            highlighted: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.transform
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn index(&self) -> Option<&AddressIndex> {
        self.attached.as_ref().map(|a| &a.index)
    }

    pub fn visual(&self) -> Option<&RenderedVisual> {
        self.attached.as_ref().map(|a| &a.visual)
    }

    pub fn selected_address(&self) -> Option<&str> {
        self.state.selected_address()
    }

    /// The resource behind the current selection.
    pub fn selected_item(&self) -> Option<&ResourceItem> {
        let address = self.state.selected_address()?;
        self.attached
            .as_ref()?
            .items
            .iter()
            .find(|it| it.address == address)
    }

    /// Replaces whatever is shown with `markup`: index, highlight and selection start from
    /// scratch and the transform is fitted to the viewport.
    pub fn attach(&mut self, markup: &str, items: &[ResourceItem]) -> Result<()> {
        let visual = RenderedVisual::parse(markup, &self.config)?;
        if self.attached.is_some() {
            self.host.clear();
        }
        self.host.mount(visual.markup());
        self.highlighted = None;

        let index = AddressIndex::build(&visual, items);
        for el in index.interactive_elements() {
            self.host.set_interactive(el, true);
        }

        let scene = Scene {
            content: visual.content_size(),
            viewport: self.viewport,
            config: &self.config,
        };
        self.state = ViewState::fitted(&scene);
        self.host.apply_transform(&self.state.transform);

        tracing::info!(
            elements = visual.elements().len(),
            interactive = index.len(),
            scale = self.state.transform.scale,
            "attached rendered visual"
        );
        self.attached = Some(Attachment {
            visual,
            items: items.to_vec(),
            index,
        });
        Ok(())
    }

    /// Attaches the visual an analysis carries in its `_server_svg` field.
    pub fn attach_analysis(&mut self, analysis: &Analysis) -> Result<()> {
        let markup = analysis
            .server_svg()
            .ok_or_else(|| Error::visual("analysis carries no pre-rendered visual"))?;
        self.attach(markup, &analysis.model.items)
    }

    /// Re-synchronizes after the model or visual may have changed.
    ///
    /// Identical markup keeps transform and selection and only rebuilds the index from `items`;
    /// a selection whose address no longer resolves is cleared. Any other markup re-attaches.
    pub fn sync(&mut self, markup: &str, items: &[ResourceItem]) -> Result<()> {
        let Some(attachment) = self.attached.as_mut() else {
            return self.attach(markup, items);
        };
        if attachment.visual.markup() != markup {
            return self.attach(markup, items);
        }

        let index = AddressIndex::build(&attachment.visual, items);
        for el in attachment.visual.elements().iter().map(|e| e.id) {
            let was = attachment.index.is_interactive(el);
            let now = index.is_interactive(el);
            if was != now {
                self.host.set_interactive(el, now);
            }
        }
        attachment.index = index;
        attachment.items = items.to_vec();

        let keep = self
            .state
            .selected_address()
            .is_some_and(|a| attachment.index.contains_address(a));
        if !keep && self.state.selected.is_some() {
            tracing::debug!(address = ?self.state.selected, "selection no longer resolves; clearing");
            self.state.selected = None;
        }
        let selected = self.state.selected_address();
        let new_highlight = self
            .highlighted
            .filter(|el| selected.is_some() && attachment.index.address_for(*el) == selected)
            .or_else(|| selected.and_then(|a| attachment.index.element_for(a)));
        self.set_highlighted(new_highlight);
        Ok(())
    }

    /// Clears the host and returns to the unattached state.
    pub fn detach(&mut self) {
        if self.attached.take().is_some() {
            self.host.clear();
        }
        self.state = ViewState::default();
        self.highlighted = None;
    }

    /// Routes one host input through the adapter. Returns the event that was applied, if any.
    ///
    /// A click highlights the element that was clicked, even when other elements resolve to the
    /// same address.
    pub fn handle(&mut self, input: &PointerInput) -> Option<ViewEvent> {
        let Some(attachment) = self.attached.as_ref() else {
            if let PointerInput::Resize { viewport } = *input {
                self.dispatch(&ViewEvent::Resize { viewport });
            }
            return None;
        };
        let event = InputAdapter::new(&attachment.index).translate(input)?;
        let clicked = match *input {
            PointerInput::Click { target } => target,
            _ => None,
        };
        self.apply_event(&event, clicked);
        Some(event)
    }

    /// Applies `event` and pushes whatever changed to the host.
    ///
    /// While unattached only `Resize` has an effect: it records the viewport the next attach
    /// fits into.
    pub fn dispatch(&mut self, event: &ViewEvent) {
        self.apply_event(event, None);
    }

    fn apply_event(&mut self, event: &ViewEvent, clicked: Option<ElementId>) {
        if let ViewEvent::Resize { viewport } = event {
            self.viewport = *viewport;
        }
        let Some(attachment) = self.attached.as_ref() else {
            tracing::trace!(?event, "view event while unattached");
            return;
        };
        if let ViewEvent::Select { address } = event {
            if !attachment.index.contains_address(address) {
                tracing::debug!(%address, "ignoring selection of an unindexed address");
                return;
            }
        }

        let scene = Scene {
            content: attachment.visual.content_size(),
            viewport: self.viewport,
            config: &self.config,
        };
        let next = self.state.apply(event, &scene);

        let transform_changed = next.transform != self.state.transform;
        let selection_changed = next.selected != self.state.selected;
        let highlight = clicked
            .filter(|el| {
                next.selected_address().is_some()
                    && attachment.index.address_for(*el) == next.selected_address()
            })
            .or_else(|| {
                next.selected_address()
                    .and_then(|a| attachment.index.element_for(a))
            });
        self.state = next;

        if transform_changed {
            self.host.apply_transform(&self.state.transform);
        }
        if selection_changed {
            self.set_highlighted(highlight);
        }
    }

    pub fn fit(&mut self) {
        self.dispatch(&ViewEvent::Fit);
    }

    pub fn resize(&mut self, viewport: Size) {
        self.dispatch(&ViewEvent::Resize { viewport });
    }

    pub fn select(&mut self, address: &str) {
        self.dispatch(&ViewEvent::Select {
            address: address.to_string(),
        });
    }

    // At most one element carries the highlight.
    fn set_highlighted(&mut self, target: Option<ElementId>) {
        if self.highlighted == target {
            return;
        }
        if let Some(old) = self.highlighted.take() {
            self.host.set_highlight(old, false);
        }
        if let Some(el) = target {
            self.host.set_highlight(el, true);
        }
        self.highlighted = target;
    }
}
