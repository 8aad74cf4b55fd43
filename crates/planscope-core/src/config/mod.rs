use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Engine configuration. Every field defaults to the built-in constant; callers override a
/// subset by deep-merging a partial JSON object (see [`Config::with_overrides`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub risk: RiskConfig,
    pub view: ViewConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Curated blast-radius multiplier per resource type.
    pub type_weights: IndexMap<String, u32>,
    /// Weight for resource types missing from `type_weights`.
    pub default_type_weight: u32,
    /// Deleting a resource at or above this weight is flagged as critical.
    pub flag_type_weight: u32,
    /// Type-identifier substrings that mark security/identity resources.
    pub security_markers: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        let type_weights = [
            ("aws_instance", 3),
            ("aws_db_instance", 5),
            ("aws_rds_cluster", 5),
            ("aws_elasticache_cluster", 4),
            ("aws_s3_bucket", 2),
            ("aws_security_group", 4),
            ("aws_iam_role", 4),
            ("aws_iam_policy", 4),
            ("aws_lambda_function", 2),
            ("aws_vpc", 5),
            ("aws_subnet", 3),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            type_weights,
            default_type_weight: 1,
            flag_type_weight: 4,
            security_markers: vec!["security_group".to_string(), "iam".to_string()],
        }
    }
}

impl RiskConfig {
    pub fn type_weight(&self, resource_type: &str) -> u32 {
        self.type_weights
            .get(resource_type)
            .copied()
            .unwrap_or(self.default_type_weight)
    }

    /// Largest weight any resource type can carry, used as the scoring normalization ceiling.
    pub fn max_type_weight(&self) -> u32 {
        self.type_weights
            .values()
            .copied()
            .fold(self.default_type_weight, u32::max)
            .max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Fraction of the exact fitting scale used by a fit, leaving a margin around the visual.
    pub fit_margin: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Multiplicative step per discrete wheel tick.
    pub wheel_step: f64,
    /// Multiplicative step per zoom-button press.
    pub button_step: f64,
    /// Intrinsic size assumed when the visual declares neither a viewBox nor width/height.
    pub default_width: f64,
    pub default_height: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fit_margin: 0.92,
            min_scale: 0.2,
            max_scale: 5.0,
            wheel_step: 1.1,
            button_step: 1.25,
            default_width: 800.0,
            default_height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub origin_x: f64,
    pub label_x: f64,
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub label_offset_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 20.0,
            label_x: 10.0,
            column_spacing: 140.0,
            row_spacing: 170.0,
            label_offset_y: 40.0,
        }
    }
}

impl Config {
    /// Deep-merges a partial JSON object over the defaults.
    pub fn with_overrides(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default()).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        if !overrides.is_object() && !overrides.is_null() {
            return Err(Error::InvalidConfig {
                message: "config overrides must be a JSON object".to_string(),
            });
        }
        deep_merge_value(&mut base, overrides);
        serde_json::from_value(base).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        Self::with_overrides(&value)
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_merge_into_defaults() {
        let cfg = Config::with_overrides(&json!({
            "risk": { "type_weights": { "aws_eks_cluster": 5, "aws_instance": 2 } },
            "view": { "max_scale": 8.0 }
        }))
        .unwrap();
        assert_eq!(cfg.risk.type_weight("aws_eks_cluster"), 5);
        assert_eq!(cfg.risk.type_weight("aws_instance"), 2);
        assert_eq!(cfg.risk.type_weight("aws_vpc"), 5);
        assert_eq!(cfg.view.max_scale, 8.0);
        assert_eq!(cfg.view.min_scale, 0.2);
    }

    #[test]
    fn default_ceiling_is_five() {
        assert_eq!(RiskConfig::default().max_type_weight(), 5);
    }

    #[test]
    fn non_object_override_is_rejected() {
        let err = Config::with_overrides(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
