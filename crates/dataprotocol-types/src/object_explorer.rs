//! Object explorer shapes (`objectexplorer/*`).

use serde::{Deserialize, Serialize};

/// One node in the object explorer tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub node_path: String,
    #[serde(default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_status: Option<String>,
    pub label: String,
    #[serde(default)]
    pub is_leaf: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<crate::metadata::WireObjectMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// Payload of `objectexplorer/sessioncreated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedParameters {
    pub success: bool,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_node: Option<NodeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Parameters of `objectexplorer/expand` and `objectexplorer/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandParams {
    pub session_id: String,
    pub node_path: String,
}

/// Payload of `objectexplorer/expandCompleted`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandResponse {
    pub session_id: String,
    pub node_path: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub nodes: Vec<NodeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSessionParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseSessionResponse {
    pub success: bool,
    pub session_id: String,
}
