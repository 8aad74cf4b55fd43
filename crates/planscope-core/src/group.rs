//! Provider → category bucketing for the model-driven layout path.

use crate::model::ResourceItem;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azurerm,
    Google,
    Other,
}

impl Provider {
    const PREFIXES: [(&'static str, Provider); 3] = [
        ("aws_", Provider::Aws),
        ("azurerm_", Provider::Azurerm),
        ("google_", Provider::Google),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azurerm => "azurerm",
            Provider::Google => "google",
            Provider::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Networking,
    Compute,
    Database,
    Storage,
    Security,
    Messaging,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Networking => "networking",
            Category::Compute => "compute",
            Category::Database => "database",
            Category::Storage => "storage",
            Category::Security => "security",
            Category::Messaging => "messaging",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Networking => "Networking",
            Category::Compute => "Compute",
            Category::Database => "Database",
            Category::Storage => "Storage",
            Category::Security => "Security & Identity",
            Category::Messaging => "Messaging",
            Category::Other => "Resources",
        }
    }
}

// Order matters: the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Networking,
        &[
            "vpc",
            "subnet",
            "virtual_network",
            "network_security_group",
            "security_group",
            "internet_gateway",
            "nat_gateway",
            "route53",
            "cloudfront",
            "elb",
            "lb",
            "alb",
            "compute_network",
            "compute_subnetwork",
            "load_balancer",
            "application_gateway",
            "dns_zone",
            "forwarding_rule",
        ],
    ),
    (
        Category::Compute,
        &[
            "instance",
            "virtual_machine",
            "linux_virtual_machine",
            "windows_virtual_machine",
            "lambda_function",
            "ecs_cluster",
            "ecs_service",
            "app_service",
            "function_app",
            "compute_instance",
            "container_group",
            "container_cluster",
            "gke",
            "app_engine",
        ],
    ),
    (
        Category::Database,
        &[
            "db_instance",
            "rds_cluster",
            "dynamodb_table",
            "elasticache",
            "sql_database",
            "cosmosdb",
            "mssql",
            "sql_database_instance",
            "firestore",
        ],
    ),
    (
        Category::Storage,
        &[
            "s3_bucket",
            "ebs_volume",
            "efs",
            "storage_account",
            "storage_blob",
            "storage_container",
            "storage_bucket",
            "gcs",
        ],
    ),
    (
        Category::Security,
        &[
            "iam_role",
            "iam_user",
            "iam_policy",
            "secretsmanager",
            "waf",
            "managed_identity",
            "user_assigned_identity",
        ],
    ),
    (Category::Messaging, &["sqs_queue", "sns_topic", "kinesis"]),
];

pub fn provider_of(resource_type: &str) -> Provider {
    Provider::PREFIXES
        .iter()
        .find(|(prefix, _)| resource_type.starts_with(prefix))
        .map(|(_, p)| *p)
        .unwrap_or(Provider::Other)
}

pub fn categorize(resource_type: &str) -> Category {
    let lower = resource_type.to_ascii_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::Other)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroup<'a> {
    pub provider: Provider,
    pub category: Category,
    pub items: Vec<&'a ResourceItem>,
}

/// Buckets items by provider, then category.
///
/// Ordering is stable: providers in first-encountered order, categories in first-encountered
/// order within their provider, items in insertion order.
pub fn group(items: &[ResourceItem]) -> Vec<ResourceGroup<'_>> {
    let mut buckets: IndexMap<Provider, IndexMap<Category, Vec<&ResourceItem>>> = IndexMap::new();
    for item in items {
        buckets
            .entry(provider_of(&item.resource_type))
            .or_default()
            .entry(categorize(&item.resource_type))
            .or_default()
            .push(item);
    }

    buckets
        .into_iter()
        .flat_map(|(provider, categories)| {
            categories
                .into_iter()
                .map(move |(category, items)| ResourceGroup {
                    provider,
                    category,
                    items,
                })
        })
        .collect()
}
