//! Admin service shapes (`admin/*`).

use serde::{Deserialize, Serialize};

use crate::Options;

/// Database properties as an option bag (`name`, `owner`, `collation`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_database: Option<String>,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseParams {
    pub owner_uri: String,
    pub database_info: DatabaseInfo,
}

/// Result of the admin create requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectResponse {
    pub result: bool,
    #[serde(default)]
    pub task_id: i64,
}

pub type CreateDatabaseResponse = CreateObjectResponse;
pub type CreateLoginResponse = CreateObjectResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoginParams {
    pub owner_uri: String,
    pub login_info: LoginInfo,
}

/// Parameters of `admin/defaultdatabaseinfo` and `backup/backupconfiginfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultDatabaseInfoParams {
    pub owner_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultDatabaseInfoResponse {
    pub default_database_info: DatabaseInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseInfoParams {
    pub owner_uri: String,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseInfoResponse {
    pub database_info: DatabaseInfo,
}
