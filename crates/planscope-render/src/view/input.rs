use super::index::AddressIndex;
use super::state::{ViewEvent, ZoomDirection};
use super::visual::ElementId;
use crate::geom::{Point, Size};

/// Raw input as a host reports it. `target` is the node group under the pointer, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down {
        at: Point,
        target: Option<ElementId>,
    },
    Move {
        at: Point,
    },
    Up,
    Click {
        target: Option<ElementId>,
    },
    Wheel {
        at: Point,
        delta_y: f64,
    },
    ZoomInButton,
    ZoomOutButton,
    FitButton,
    Resize {
        viewport: Size,
    },
}

/// Translates host input into [`ViewEvent`]s against the current address index.
#[derive(Debug, Clone, Copy)]
pub struct InputAdapter<'a> {
    index: &'a AddressIndex,
}

impl<'a> InputAdapter<'a> {
    pub fn new(index: &'a AddressIndex) -> Self {
        Self { index }
    }

    pub fn translate(&self, input: &PointerInput) -> Option<ViewEvent> {
        match *input {
            PointerInput::Down { at, target } => {
                let on_interactive = target.is_some_and(|el| self.index.is_interactive(el));
                (!on_interactive).then_some(ViewEvent::PanStart { at })
            }
            PointerInput::Move { at } => Some(ViewEvent::PanMove { at }),
            PointerInput::Up => Some(ViewEvent::PanEnd),
            PointerInput::Click { target } => {
                let address = self.index.address_for(target?)?;
                Some(ViewEvent::Select {
                    address: address.to_string(),
                })
            }
            PointerInput::Wheel { at, delta_y } => Some(ViewEvent::ZoomTick {
                at,
                direction: if delta_y < 0.0 {
                    ZoomDirection::In
                } else {
                    ZoomDirection::Out
                },
            }),
            PointerInput::ZoomInButton => Some(ViewEvent::ZoomButton {
                direction: ZoomDirection::In,
            }),
            PointerInput::ZoomOutButton => Some(ViewEvent::ZoomButton {
                direction: ZoomDirection::Out,
            }),
            PointerInput::FitButton => Some(ViewEvent::Fit),
            PointerInput::Resize { viewport } => Some(ViewEvent::Resize { viewport }),
        }
    }
}
