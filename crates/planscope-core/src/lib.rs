#![forbid(unsafe_code)]

//! Terraform plan / architecture analysis (headless).
//!
//! Raw input (a plan diff or a static topology) is normalized into one item/edge model, each
//! resource's change is classified, and a bounded risk score is derived. Everything in this
//! crate is synchronous and free of shared mutable state; the only stateful piece is
//! [`Session`], which remembers the last analysis for a later simulated apply.

pub mod analysis;
pub mod classify;
pub mod config;
pub mod edges;
pub mod error;
pub mod group;
pub mod input;
pub mod model;
pub mod normalize;
pub mod risk;

pub use analysis::{Analysis, ApplyOutcome, ApplyRequest, Session};
pub use classify::classify;
pub use config::{Config, LayoutConfig, RiskConfig, ViewConfig};
pub use edges::{ModelEdge, derive_edges};
pub use error::{Error, Result};
pub use group::{Category, Provider, ResourceGroup, categorize, group, provider_of};
pub use input::{PlanEnvelope, PlanInput, parse_payload};
pub use model::{ActionCounts, ActionKind, Connection, ResourceItem};
pub use normalize::{NormalizedModel, normalize};
pub use risk::{FlagReason, FlaggedItem, RiskAssessment, RiskLevel, RiskSubject, score};

#[cfg(test)]
mod tests;
