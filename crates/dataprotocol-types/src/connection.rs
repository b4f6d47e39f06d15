//! Connection management shapes.

use serde::{Deserialize, Serialize};

use crate::Options;

/// Connection details as the host knows them: a bag of provider options
/// (`server`, `database`, `user`, `authenticationType`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    #[serde(default)]
    pub options: Options,
}

/// Wire form of connection details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub owner_uri: String,
    pub connection: ConnectionDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelConnectParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDatabaseParams {
    pub owner_uri: String,
    pub new_database: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatabasesParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatabasesResult {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub database_names: Vec<String>,
}

/// Short description of an established connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub server_name: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default)]
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub server_major_version: u32,
    #[serde(default)]
    pub server_minor_version: u32,
    #[serde(default)]
    pub server_release_version: u32,
    #[serde(default)]
    pub engine_edition_id: i32,
    #[serde(default)]
    pub server_version: String,
    #[serde(default)]
    pub server_level: String,
    #[serde(default)]
    pub server_edition: String,
    #[serde(default)]
    pub is_cloud: bool,
    #[serde(default)]
    pub azure_version: u32,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub options: Options,
}

/// Payload of `connection/complete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCompleteParams {
    pub owner_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_info: Option<ServerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_summary: Option<ConnectionSummary>,
}

/// Payload of `connection/connectionchanged` as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionChangedParams {
    pub owner_uri: String,
    pub connection: ConnectionSummary,
}

/// Connection change as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedConnectionInfo {
    pub connection_uri: String,
    pub connection: ConnectionSummary,
}

/// Payload of `connection/languageflavorchanged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageFlavorChangedParams {
    pub uri: String,
    pub language: String,
    pub flavor: String,
}

/// Payload of `textDocument/rebuildIntelliSense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildIntelliSenseParams {
    pub owner_uri: String,
}

/// Payload of `textDocument/intelliSenseReady`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelliSenseReadyParams {
    pub owner_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_params_wire_shape() {
        let mut options = Options::new();
        options.insert("server".to_string(), json!("localhost"));
        let params = ConnectParams {
            owner_uri: "file:///a.sql".to_string(),
            connection: ConnectionDetails { options },
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({"ownerUri": "file:///a.sql", "connection": {"options": {"server": "localhost"}}})
        );
    }

    #[test]
    fn test_list_databases_result_null_names() {
        let result: ListDatabasesResult =
            serde_json::from_value(json!({"databaseNames": null})).unwrap();
        assert!(result.database_names.is_empty());

        let result: ListDatabasesResult = serde_json::from_value(json!({})).unwrap();
        assert!(result.database_names.is_empty());
    }

    #[test]
    fn test_connection_complete_tolerates_missing_fields() {
        let params: ConnectionCompleteParams =
            serde_json::from_value(json!({"ownerUri": "u", "futureField": 1})).unwrap();
        assert_eq!(params.owner_uri, "u");
        assert!(params.error_message.is_none());
        assert!(params.server_info.is_none());
    }
}
