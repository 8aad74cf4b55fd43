#![forbid(unsafe_code)]

//! `planscope` is a headless Terraform plan / architecture analyzer.
//!
//! It classifies each resource change, scores the overall risk of a plan, and normalizes plans
//! and static topologies into one item/edge model that a viewer can lay out or synchronize with a
//! pre-rendered SVG.
//!
//! # Features
//!
//! - `render`: enable reports, diagram descriptions, layout and view synchronization
//!   (`planscope::render`)

pub use planscope_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use planscope_render::geom::{Point, Size, point, size};
    pub use planscope_render::{
        AddressIndex, ElementId, HeadlessHost, HostCall, ModelLayout, PointerInput,
        RenderedVisual, ResourceDetail, ViewEvent, ViewHost, ViewSynchronizer, ViewTransform,
        ZoomDirection, layout_analysis, render_analysis, render_apply_report,
        render_diagram_description, render_risk_report,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] planscope_core::Error),
        #[error(transparent)]
        Render(#[from] planscope_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Parses a payload and renders the full markdown analysis document.
    pub fn analyze_and_render(text: &str, config: &planscope_core::Config) -> Result<String> {
        let analysis = planscope_core::Analysis::parse(text, config)?;
        Ok(render_analysis(&analysis, &analysis.risk))
    }

    /// Builds a synchronizer over the analysis' own server-rendered visual.
    pub fn attach_view<H: ViewHost>(
        analysis: &planscope_core::Analysis,
        host: H,
        config: &planscope_core::Config,
        viewport: Size,
    ) -> Result<ViewSynchronizer<H>> {
        let mut sync = ViewSynchronizer::new(host, config.view.clone(), viewport);
        sync.attach_analysis(analysis)?;
        Ok(sync)
    }

    /// Bundles a [`planscope_core::Config`] with a [`planscope_core::Session`] so callers do not
    /// thread both through every call.
    ///
    /// All work is CPU-bound and performs no I/O.
    #[derive(Debug, Clone)]
    pub struct HeadlessAnalyzer {
        session: planscope_core::Session,
    }

    impl Default for HeadlessAnalyzer {
        fn default() -> Self {
            Self::new(planscope_core::Config::default())
        }
    }

    impl HeadlessAnalyzer {
        pub fn new(config: planscope_core::Config) -> Self {
            Self {
                session: planscope_core::Session::new(config),
            }
        }

        pub fn config(&self) -> &planscope_core::Config {
            self.session.config()
        }

        pub fn session(&self) -> &planscope_core::Session {
            &self.session
        }

        pub fn analyze(&mut self, text: &str) -> Result<&planscope_core::Analysis> {
            Ok(self.session.analyze(text)?)
        }

        pub fn report(&mut self, text: &str) -> Result<String> {
            let analysis = self.session.analyze(text)?;
            Ok(render_analysis(analysis, &analysis.risk))
        }

        pub fn diagram(&mut self, text: &str) -> Result<String> {
            Ok(render_diagram_description(self.session.analyze(text)?))
        }

        pub fn layout(&mut self, text: &str) -> Result<ModelLayout> {
            let layout = self.config().layout.clone();
            Ok(layout_analysis(self.session.analyze(text)?, &layout))
        }

        /// Simulated apply of the most recent analysis.
        pub fn apply(&self, request: &planscope_core::ApplyRequest) -> Result<String> {
            let outcome = self.session.apply(request)?;
            Ok(render_apply_report(request, &outcome))
        }
    }
}
