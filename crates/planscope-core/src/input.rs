//! Raw input payloads as delivered by the transport.
//!
//! Two structurally different shapes are accepted. The `_mode` marker is a hard branch: only
//! `"architecture"` selects [`PlanInput::Architecture`]; everything else is a Terraform plan diff.

use crate::model::Connection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MODE_KEY: &str = "_mode";
pub const ARCHITECTURE_MODE: &str = "architecture";
pub const SERVER_SVG_KEY: &str = "_server_svg";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPayload {
    #[serde(default)]
    pub resource_changes: Vec<RawResourceChange>,
    #[serde(default)]
    pub configuration: Option<Configuration>,
    #[serde(default)]
    pub terraform_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub change: RawChange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChange {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub root_module: Option<RootModule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootModule {
    #[serde(default)]
    pub resources: Vec<ConfiguredResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredResource {
    pub address: String,
    #[serde(default)]
    pub depends_on: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturePayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub resources: Vec<RawArchitectureResource>,
    #[serde(default)]
    pub connections: Option<Vec<Connection>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArchitectureResource {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanInput {
    Diff(DiffPayload),
    Architecture(ArchitecturePayload),
}

impl PlanInput {
    pub fn is_architecture(&self) -> bool {
        matches!(self, PlanInput::Architecture(_))
    }
}

/// A parsed payload plus the optional pre-rendered visual carried next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEnvelope {
    pub input: PlanInput,
    pub server_svg: Option<String>,
}

impl PlanEnvelope {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::parse("expected a JSON object at the top level"));
        };

        let server_svg = match map.remove(SERVER_SVG_KEY) {
            Some(Value::String(svg)) => Some(svg),
            Some(Value::Null) | None => None,
            Some(_) => return Err(Error::parse("`_server_svg` must be a string")),
        };

        let is_architecture =
            map.get(MODE_KEY).and_then(Value::as_str) == Some(ARCHITECTURE_MODE);

        let value = Value::Object(map);
        let input = if is_architecture {
            PlanInput::Architecture(serde_json::from_value(value).map_err(Error::parse)?)
        } else {
            PlanInput::Diff(serde_json::from_value(value).map_err(Error::parse)?)
        };

        Ok(Self { input, server_svg })
    }
}

/// Parses raw JSON text into a [`PlanEnvelope`].
///
/// Malformed JSON, a non-object document, or a payload whose fields have the wrong shape all
/// fail with [`Error::Parse`] before any normalization happens.
pub fn parse_payload(text: &str) -> Result<PlanEnvelope> {
    let value: Value = serde_json::from_str(text).map_err(Error::parse)?;
    PlanEnvelope::from_value(value)
}
