use indexmap::IndexSet;
use planscope_core::{ActionKind, ResourceItem};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyChange {
    pub key: String,
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DetailSection {
    Configuration {
        title: &'static str,
        entries: Vec<DetailEntry>,
    },
    Changes {
        entries: Vec<PropertyChange>,
    },
}

impl DetailSection {
    pub fn title(&self) -> &'static str {
        match self {
            DetailSection::Configuration { title, .. } => *title,
            DetailSection::Changes { .. } => "Changes",
        }
    }
}

/// Inspectable view of one selected resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDetail {
    pub address: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub action: ActionKind,
    pub label: String,
    pub body: Option<DetailSection>,
    pub dependencies: Vec<String>,
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn configuration_entries(value: &Value) -> Vec<DetailEntry> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| DetailEntry {
            key: k.clone(),
            value: pretty(v),
        })
        .collect()
}

fn changed_properties(before: &Value, after: &Value) -> Vec<PropertyChange> {
    let keys: IndexSet<&String> = [before, after]
        .into_iter()
        .filter_map(Value::as_object)
        .flat_map(|m| m.keys())
        .collect();

    keys.into_iter()
        .filter_map(|k| {
            let old = pretty(before.get(k).unwrap_or(&Value::Null));
            let new = pretty(after.get(k).unwrap_or(&Value::Null));
            (old != new).then(|| PropertyChange {
                key: k.clone(),
                old,
                new,
            })
        })
        .collect()
}

impl ResourceDetail {
    pub fn action_label(action: ActionKind) -> &'static str {
        match action {
            ActionKind::Create => "Creating",
            ActionKind::Delete => "Destroying",
            ActionKind::Update => "Updating",
            ActionKind::Replace => "Replacing",
            ActionKind::NoOp => ActionKind::NoOp.as_str(),
        }
    }

    pub fn for_item(item: &ResourceItem) -> Self {
        let present = |v: &Option<Value>| v.as_ref().filter(|v| !v.is_null()).cloned();
        let before = present(&item.before);
        let after = present(&item.after);

        let body = match (item.action, before, after) {
            (ActionKind::Create, _, Some(after)) => Some(DetailSection::Configuration {
                title: "New Configuration",
                entries: configuration_entries(&after),
            }),
            (ActionKind::Delete, Some(before), _) => Some(DetailSection::Configuration {
                title: "Removed Configuration",
                entries: configuration_entries(&before),
            }),
            (ActionKind::Update | ActionKind::Replace, Some(before), Some(after)) => {
                Some(DetailSection::Changes {
                    entries: changed_properties(&before, &after),
                })
            }
            _ => None,
        };

        Self {
            address: item.address.clone(),
            name: item.name.clone(),
            resource_type: item.resource_type.clone(),
            action: item.action,
            label: Self::action_label(item.action).to_string(),
            body,
            dependencies: item.deps.clone(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(&mut out, "### {}", self.name);
        let _ = writeln!(&mut out, "`{}` ({})", self.address, self.resource_type);
        let _ = writeln!(&mut out, "**{}**", self.label);

        if let Some(section) = &self.body {
            let _ = write!(&mut out, "\n#### {}\n", section.title());
            match section {
                DetailSection::Configuration { entries, .. } => {
                    for e in entries {
                        let _ = writeln!(&mut out, "- {}: {}", e.key, e.value);
                    }
                }
                DetailSection::Changes { entries } => {
                    for c in entries {
                        let _ = writeln!(&mut out, "- {}\n  − {}\n  + {}", c.key, c.old, c.new);
                    }
                }
            }
        }

        if !self.dependencies.is_empty() {
            out.push_str("\n#### Dependencies\n");
            for d in &self.dependencies {
                let _ = writeln!(&mut out, "- {d}");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(action: ActionKind, before: Value, after: Value) -> ResourceItem {
        ResourceItem {
            address: "aws_instance.web".to_string(),
            resource_type: "aws_instance".to_string(),
            name: "web".to_string(),
            action,
            before: Some(before),
            after: Some(after),
            deps: vec!["aws_subnet.a".to_string()],
        }
    }

    #[test]
    fn create_lists_non_null_after_entries() {
        let detail = ResourceDetail::for_item(&item(
            ActionKind::Create,
            Value::Null,
            json!({ "ami": "ami-1", "tags": null }),
        ));
        assert_eq!(detail.label, "Creating");
        let Some(DetailSection::Configuration { title, entries }) = detail.body else {
            panic!("expected configuration section");
        };
        assert_eq!(title, "New Configuration");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "ami");
        assert_eq!(entries[0].value, "\"ami-1\"");
    }

    #[test]
    fn update_lists_only_differing_keys() {
        let detail = ResourceDetail::for_item(&item(
            ActionKind::Update,
            json!({ "ami": "ami-1", "type": "t3.micro" }),
            json!({ "ami": "ami-1", "type": "t3.large", "monitoring": true }),
        ));
        let Some(DetailSection::Changes { entries }) = detail.body else {
            panic!("expected changes section");
        };
        let keys: Vec<_> = entries.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["type", "monitoring"]);
        assert_eq!(entries[1].old, "null");
        assert_eq!(entries[1].new, "true");
    }

    #[test]
    fn delete_without_before_has_no_body() {
        let mut it = item(ActionKind::Delete, Value::Null, Value::Null);
        it.before = None;
        let detail = ResourceDetail::for_item(&it);
        assert_eq!(detail.label, "Destroying");
        assert!(detail.body.is_none());
        assert!(detail.to_markdown().contains("#### Dependencies\n- aws_subnet.a"));
    }
}
