use crate::geom::{Point, Size, Vector, point, vector};
use serde::Serialize;

/// Viewport mapping of the visual: `viewport = pan + content × scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub pan: Vector,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        pan: Vector::new(0.0, 0.0),
    };

    /// Centers `content` in `viewport` at `margin` × the exact fitting scale.
    ///
    /// Returns `None` while either size is degenerate; callers keep their previous transform.
    pub fn fit(content: Size, viewport: Size, margin: f64) -> Option<Self> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        if content.width <= 0.0 || content.height <= 0.0 {
            return None;
        }
        let scale = (viewport.width / content.width).min(viewport.height / content.height) * margin;
        let pan = vector(
            (viewport.width - content.width * scale) / 2.0,
            (viewport.height - content.height * scale) / 2.0,
        );
        Some(Self { scale, pan })
    }

    /// Rescales to `new_scale` keeping the content point under `anchor` (viewport space) fixed.
    pub fn zoom_at(self, anchor: Point, new_scale: f64) -> Self {
        let ratio = new_scale / self.scale;
        let pan = anchor.to_vector() - (anchor.to_vector() - self.pan) * ratio;
        Self {
            scale: new_scale,
            pan,
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    pub fn panned_by(self, delta: Vector) -> Self {
        Self {
            pan: self.pan + delta,
            ..self
        }
    }

    pub fn to_viewport(&self, content: Point) -> Point {
        point(
            self.pan.x + content.x * self.scale,
            self.pan.y + content.y * self.scale,
        )
    }

    pub fn to_content(&self, viewport: Point) -> Point {
        point(
            (viewport.x - self.pan.x) / self.scale,
            (viewport.y - self.pan.y) / self.scale,
        )
    }

    /// CSS transform string for hosts that render into a DOM.
    pub fn css(&self) -> String {
        format!(
            "translate({}px,{}px) scale({})",
            self.pan.x, self.pan.y, self.scale
        )
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round().max(0.0) as u32
    }
}
