use super::transform::ViewTransform;
use crate::geom::{Point, Size, Vector};
use planscope_core::ViewConfig;

/// Direction of a discrete zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A matched element was activated.
    Select { address: String },
    ClearSelection,
    PanStart { at: Point },
    PanMove { at: Point },
    PanEnd,
    /// One wheel tick anchored at a viewport position.
    ZoomTick { at: Point, direction: ZoomDirection },
    /// Explicit zoom-button press; pan is left unchanged.
    ZoomButton { direction: ZoomDirection },
    Fit,
    Resize { viewport: Size },
}

/// Read-only context a transition is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Intrinsic size of the attached visual.
    pub content: Size,
    pub viewport: Size,
    pub config: &'a ViewConfig,
}

impl Scene<'_> {
    fn fit(&self, viewport: Size) -> Option<ViewTransform> {
        ViewTransform::fit(self.content, viewport, self.config.fit_margin)
    }

    /// Every zoom result lands in `[min_scale, max_scale]`, even when starting from an
    /// out-of-range fit.
    fn step_scale(&self, scale: f64, step: f64, direction: ZoomDirection) -> f64 {
        let next = match direction {
            ZoomDirection::In => scale * step,
            ZoomDirection::Out => scale / step,
        };
        next.max(self.config.min_scale).min(self.config.max_scale)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        origin: Point,
        pan_at_start: Vector,
    },
}

/// Selection and transform of an attached view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub transform: ViewTransform,
    pub selected: Option<String>,
    pub gesture: Gesture,
}

impl ViewState {
    pub fn fitted(scene: &Scene<'_>) -> Self {
        Self {
            transform: scene.fit(scene.viewport).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn pan(&self) -> Vector {
        self.transform.pan
    }

    pub fn selected_address(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Pure transition. Selection events never touch the transform and transform events never
    /// touch the selection.
    pub fn apply(&self, event: &ViewEvent, scene: &Scene<'_>) -> ViewState {
        let mut next = self.clone();
        match event {
            ViewEvent::Select { address } => {
                next.selected = if self.selected.as_deref() == Some(address.as_str()) {
                    None
                } else {
                    Some(address.clone())
                };
            }
            ViewEvent::ClearSelection => next.selected = None,
            ViewEvent::PanStart { at } => {
                next.gesture = Gesture::Panning {
                    origin: *at,
                    pan_at_start: self.transform.pan,
                };
            }
            ViewEvent::PanMove { at } => {
                if let Gesture::Panning {
                    origin,
                    pan_at_start,
                } = self.gesture
                {
                    next.transform.pan = pan_at_start + (*at - origin);
                }
            }
            ViewEvent::PanEnd => next.gesture = Gesture::Idle,
            ViewEvent::ZoomTick { at, direction } => {
                let scale = scene.step_scale(self.transform.scale, scene.config.wheel_step, *direction);
                next.transform = self.transform.zoom_at(*at, scale);
            }
            ViewEvent::ZoomButton { direction } => {
                let scale =
                    scene.step_scale(self.transform.scale, scene.config.button_step, *direction);
                next.transform = self.transform.with_scale(scale);
            }
            ViewEvent::Fit => {
                if let Some(t) = scene.fit(scene.viewport) {
                    next.transform = t;
                }
            }
            ViewEvent::Resize { viewport } => {
                if let Some(t) = scene.fit(*viewport) {
                    next.transform = t;
                }
            }
        }
        next
    }
}
