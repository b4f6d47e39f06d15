//! Edit-data session shapes (`edit/*`).

use serde::{Deserialize, Serialize};

use crate::query::DbCellValue;

/// Parameters of every edit request that only names the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSessionParams {
    pub owner_uri: String,
}

pub type EditCommitParams = EditSessionParams;
pub type EditCreateRowParams = EditSessionParams;
pub type EditDisposeParams = EditSessionParams;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInitializeFiltering {
    #[serde(rename = "LimitResults", default, skip_serializing_if = "Option::is_none")]
    pub limit_results: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInitializeParams {
    pub owner_uri: String,
    pub schema_name: String,
    pub object_name: String,
    pub object_type: String,
    pub filters: EditInitializeFiltering,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRowParams {
    pub owner_uri: String,
    pub row_id: i64,
}

pub type EditDeleteRowParams = EditRowParams;
pub type EditRevertRowParams = EditRowParams;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRevertCellParams {
    pub owner_uri: String,
    pub row_id: i64,
    pub column_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUpdateCellParams {
    pub owner_uri: String,
    pub row_id: i64,
    pub column_id: i64,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSubsetParams {
    pub owner_uri: String,
    pub row_start_index: u64,
    pub row_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCell {
    #[serde(flatten)]
    pub value: DbCellValue,
    #[serde(default)]
    pub is_dirty: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum EditRowState {
    #[default]
    Clean,
    DirtyInsert,
    DirtyDelete,
    DirtyUpdate,
}

impl From<i32> for EditRowState {
    fn from(value: i32) -> Self {
        match value {
            1 => EditRowState::DirtyInsert,
            2 => EditRowState::DirtyDelete,
            3 => EditRowState::DirtyUpdate,
            _ => EditRowState::Clean,
        }
    }
}

impl From<EditRowState> for i32 {
    fn from(value: EditRowState) -> Self {
        match value {
            EditRowState::Clean => 0,
            EditRowState::DirtyInsert => 1,
            EditRowState::DirtyDelete => 2,
            EditRowState::DirtyUpdate => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRow {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub cells: Vec<DbCellValue>,
    pub id: i64,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default)]
    pub state: EditRowState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCreateRowResult {
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub default_values: Vec<String>,
    pub new_row_id: i64,
}

/// Result of `edit/revertCell` and `edit/updateCell`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCellResult {
    pub cell: EditCell,
    #[serde(default)]
    pub is_row_dirty: bool,
}

pub type EditRevertCellResult = EditCellResult;
pub type EditUpdateCellResult = EditCellResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSubsetResult {
    pub row_count: i64,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub subset: Vec<EditRow>,
}

/// Payload of `edit/sessionReady`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSessionReadyParams {
    pub owner_uri: String,
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
