//! Backup shapes (`backup/*`).

use serde::{Deserialize, Serialize};

use crate::Options;
use crate::admin::DatabaseInfo;
use crate::tasks::TaskExecutionMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupParams {
    pub owner_uri: String,
    pub backup_info: Options,
    pub task_execution_mode: TaskExecutionMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupResponse {
    pub result: bool,
    #[serde(default)]
    pub task_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfigInfo {
    #[serde(default)]
    pub recovery_model: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub default_backup_folder: Vec<String>,
    #[serde(default)]
    pub backup_encryptors: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_info: Option<DatabaseInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupConfigInfoResponse {
    pub backup_config_info: BackupConfigInfo,
}
