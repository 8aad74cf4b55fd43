//! Synchronization of a pre-rendered SVG with the resource model.
//!
//! [`RenderedVisual`] parses the markup once, [`AddressIndex`] resolves node groups to resource
//! addresses, [`ViewState::apply`] is the pure pan/zoom/select transition, and
//! [`ViewSynchronizer`] glues these to a [`ViewHost`].

pub mod host;
pub mod index;
pub mod input;
pub mod state;
pub mod sync;
pub mod transform;
pub mod visual;

pub use host::{HeadlessHost, HostCall, ViewHost};
pub use index::{AddressIndex, MatchStrategy, strip_marker};
pub use input::{InputAdapter, PointerInput};
pub use state::{Gesture, Scene, ViewEvent, ViewState, ZoomDirection};
pub use sync::ViewSynchronizer;
pub use transform::ViewTransform;
pub use visual::{ElementId, RenderedVisual, VisualElement};
