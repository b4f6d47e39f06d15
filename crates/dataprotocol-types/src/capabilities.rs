//! Capability discovery shapes (`capabilities/list`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the host tells the server about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProtocolClientCapabilities {
    pub host_name: String,
    pub host_version: String,
}

pub type CapabilitiesListParams = DataProtocolClientCapabilities;

/// One option a provider accepts (for example a connection option).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub category_values: Vec<Value>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_value_type: Option<String>,
    #[serde(default)]
    pub is_identity: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProviderOptions {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub options: Vec<ServiceOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminServicesProviderOptions {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub database_info_options: Vec<ServiceOption>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub database_file_info_options: Vec<ServiceOption>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub file_group_info_options: Vec<ServiceOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMetadataProvider {
    pub feature_name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub options_metadata: Vec<ServiceOption>,
}

/// Capabilities reported by a provider through `capabilities/list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProtocolServerCapabilities {
    #[serde(default)]
    pub protocol_version: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub provider_display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_provider: Option<ConnectionProviderOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_services_provider: Option<AdminServicesProviderOptions>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub features: Vec<FeatureMetadataProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesResult {
    pub capabilities: DataProtocolServerCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_capabilities_minimal() {
        let result: CapabilitiesResult = serde_json::from_value(json!({
            "capabilities": {
                "protocolVersion": "1.0",
                "providerName": "MSSQL",
                "providerDisplayName": "Microsoft SQL Server",
                "connectionProvider": {"options": [{"name": "server", "isRequired": true}]},
                "features": null
            }
        }))
        .unwrap();

        let caps = result.capabilities;
        assert_eq!(caps.provider_name, "MSSQL");
        assert!(caps.features.is_empty());
        let options = caps.connection_provider.unwrap().options;
        assert_eq!(options.len(), 1);
        assert!(options[0].is_required);
        assert!(caps.admin_services_provider.is_none());
    }
}
