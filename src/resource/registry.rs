//! Resource Registry - Load resource definitions from JSON
//!
//! Display metadata for every resource kind (tab title, search form,
//! table columns) lives in embedded JSON files and is served to the
//! browser, which builds its tabs and tables from it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/common.json"),
    include_str!("../resources/compute.json"),
    include_str!("../resources/network.json"),
    include_str!("../resources/storage.json"),
    include_str!("../resources/identity.json"),
];

/// Badge definition: cell value -> CSS class
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BadgeDef {
    pub value: String,
    pub class: String,
}

/// Search form field
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParamDef {
    /// Query-string key
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
}

/// Table column
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ColumnDef {
    pub header: String,
    /// Record field rendered in this column
    pub field: String,
    #[serde(default)]
    pub monospace: bool,
    #[serde(default)]
    pub badge_map: Option<String>,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ResourceDef {
    pub display_name: String,
    pub resource_type: String,
    /// Tab position
    #[serde(default)]
    pub order: u32,
    pub params: Vec<ParamDef>,
    pub columns: Vec<ColumnDef>,
}

impl ResourceDef {
    pub fn param_keys(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.key.as_str()).collect()
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub badge_maps: HashMap<String, Vec<BadgeDef>>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Registry entry as served to the browser
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry<'a> {
    pub key: &'a str,
    #[serde(flatten)]
    pub def: &'a ResourceDef,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            badge_maps: HashMap::new(),
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.badge_maps.extend(partial.badge_maps);
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// All resource definitions in tab order
pub fn list_resources() -> Vec<RegistryEntry<'static>> {
    let mut entries: Vec<RegistryEntry<'static>> = get_registry()
        .resources
        .iter()
        .map(|(key, def)| RegistryEntry { key, def })
        .collect();
    entries.sort_by(|a, b| a.def.order.cmp(&b.def.order).then(a.key.cmp(b.key)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let registry = get_registry();
        assert_eq!(registry.resources.len(), 10, "Registry should have all kinds");
    }

    #[test]
    fn test_ec2_resource_exists() {
        let resource = get_resource("ec2").expect("EC2 resource should exist");
        assert_eq!(resource.display_name, "EC2 Instances");
        assert_eq!(resource.resource_type, "AWS::EC2::Instance");
        assert_eq!(
            resource.param_keys(),
            vec!["accountId", "region", "instanceId", "ipAddress", "name"]
        );
    }

    #[test]
    fn test_list_resources_is_ordered() {
        let keys: Vec<&str> = list_resources().iter().map(|e| e.key).collect();
        assert_eq!(keys[0], "ec2");
        assert_eq!(keys[1], "vpc");
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_badge_maps_referenced_by_columns_exist() {
        for entry in list_resources() {
            for column in &entry.def.columns {
                if let Some(map) = &column.badge_map {
                    assert!(
                        get_registry().badge_maps.contains_key(map),
                        "{}: missing badge map {}",
                        entry.key,
                        map
                    );
                }
            }
        }
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = list_resources().into_iter().find(|e| e.key == "vpc").unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["key"], "vpc");
        assert_eq!(value["displayName"], "VPCs");
        assert_eq!(value["resourceType"], "AWS::EC2::VPC");
        assert_eq!(value["columns"][5]["badgeMap"], "state");
    }
}
