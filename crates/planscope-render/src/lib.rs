#![forbid(unsafe_code)]

//! Presentation layer for planscope analyses.
//!
//! Everything here consumes a [`planscope_core::Analysis`] (or its parts) and produces something
//! a user looks at: markdown reports, a flowchart description, a model-driven layout, or a
//! synchronized view over a pre-rendered SVG.

pub mod detail;
pub mod diagram;
pub mod geom;
pub mod layout;
pub mod report;
pub mod view;

pub use detail::{DetailSection, ResourceDetail};
pub use diagram::{render_diagram_description, sanitize_id};
pub use layout::{
    Bounds, LayoutEdge, LayoutNode, LayoutNodeKind, ModelLayout, layout_analysis, layout_groups,
};
pub use report::{
    render_analysis, render_apply_report, render_change_summary, render_plan, render_risk_report,
};
pub use view::{
    AddressIndex, ElementId, HeadlessHost, HostCall, InputAdapter, PointerInput, RenderedVisual,
    ViewEvent, ViewHost, ViewState, ViewSynchronizer, ViewTransform, ZoomDirection,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid rendered visual: {message}")]
    Visual { message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] planscope_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn visual(message: impl std::fmt::Display) -> Self {
        Error::Visual {
            message: message.to_string(),
        }
    }
}
