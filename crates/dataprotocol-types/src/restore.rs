//! Restore shapes (`restore/*`).

use serde::{Deserialize, Serialize};

use crate::Options;
use crate::tasks::TaskExecutionMode;

/// Parameters of `restore/restore`, `restore/restoreplan` and
/// `restore/cancelrestoreplan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreParams {
    pub owner_uri: String,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub task_execution_mode: TaskExecutionMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResponse {
    pub result: bool,
    #[serde(default)]
    pub task_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreDatabaseFileInfo {
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub logical_file_name: String,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default)]
    pub restore_as_file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFileInfo {
    #[serde(default)]
    pub properties: Vec<serde_json::Value>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePlanResponse {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub backup_sets_to_restore: Vec<DatabaseFileInfo>,
    #[serde(default)]
    pub can_restore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub db_files: Vec<RestoreDatabaseFileInfo>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub database_names_from_backup_sets: Vec<String>,
    #[serde(default)]
    pub plan_details: Options,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreConfigInfoRequestParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreConfigInfoResponse {
    #[serde(default)]
    pub config_info: Options,
}

/// Restore configuration handed to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreConfigInfo {
    pub config_info: Options,
}
