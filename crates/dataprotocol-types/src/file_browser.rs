//! Server-side file browser shapes (`filebrowser/*`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTreeNode {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub children: Vec<FileTreeNode>,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub is_file: bool,
    pub name: String,
    pub full_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTree {
    pub root_node: FileTreeNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_node: Option<FileTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserOpenParams {
    pub owner_uri: String,
    pub expand_path: String,
    pub file_filters: Vec<String>,
    pub change_filter: bool,
}

/// Payload of `filebrowser/opencomplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserOpenedParams {
    pub owner_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_tree: Option<FileTree>,
    pub succeeded: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserExpandParams {
    pub owner_uri: String,
    pub expand_path: String,
}

/// Payload of `filebrowser/expandcomplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserExpandedParams {
    pub owner_uri: String,
    pub expand_path: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub children: Vec<FileTreeNode>,
    pub succeeded: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserValidateParams {
    pub owner_uri: String,
    pub service_type: String,
    pub selected_files: Vec<String>,
}

/// Payload of `filebrowser/validatecomplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserValidatedParams {
    pub succeeded: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserCloseParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBrowserCloseResponse {
    pub succeeded: bool,
    #[serde(default)]
    pub message: String,
}
