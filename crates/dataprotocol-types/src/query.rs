//! Query execution shapes (`query/*`).

use serde::{Deserialize, Serialize};

/// Text range inside a document, zero based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionData {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

/// Execution plan options as the host expresses them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlanOptions {
    pub display_estimated_query_plan: bool,
    pub display_actual_query_plan: bool,
}

/// Execution plan options on the wire; both unset means "no plan requested".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecutionPlanOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_estimated_execution_plan_xml: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_actual_execution_plan_xml: Option<bool>,
}

/// Parameters of `query/executeDocumentSelection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteParams {
    pub owner_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_selection: Option<SelectionData>,
    pub execution_plan_options: QueryExecutionPlanOptions,
}

/// Parameters of `query/executedocumentstatement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteStatementParams {
    pub owner_uri: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Parameters of `query/executeString`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteStringParams {
    pub owner_uri: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleExecuteParams {
    pub owner_uri: String,
    pub query_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_db_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_catalog_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_table_name: Option<String>,
    #[serde(default)]
    pub column_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_ordinal: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_aliased: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_auto_increment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expression: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_identity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_xml: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_json: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbCellValue {
    #[serde(default)]
    pub display_value: String,
    #[serde(default)]
    pub is_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invariant_culture_display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleExecuteResult {
    pub row_count: i64,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub column_info: Vec<DbColumn>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub rows: Vec<Vec<DbCellValue>>,
}

/// Parameters shared by `query/cancel` and `query/dispose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOwnerParams {
    pub owner_uri: String,
}

pub type QueryCancelParams = QueryOwnerParams;
pub type QueryDisposeParams = QueryOwnerParams;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCancelResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteSubsetParams {
    pub owner_uri: String,
    pub batch_index: u32,
    pub result_set_index: u32,
    pub rows_start_index: u64,
    pub rows_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetSubset {
    pub row_count: i64,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub rows: Vec<Vec<DbCellValue>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteSubsetResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result_subset: ResultSetSubset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSetSummary {
    pub id: u32,
    pub batch_id: u32,
    pub row_count: i64,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub column_info: Vec<DbColumn>,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub id: u32,
    #[serde(default)]
    pub has_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionData>,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub result_set_summaries: Vec<ResultSetSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_elapsed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_start: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<u32>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub message: String,
}

/// Payload of `query/complete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteCompleteParams {
    pub owner_uri: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub batch_summaries: Vec<BatchSummary>,
}

/// Payload of `query/batchStart` and `query/batchComplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteBatchParams {
    pub owner_uri: String,
    pub batch_summary: BatchSummary,
}

/// Payload of `query/resultSetComplete`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteResultSetCompleteParams {
    pub owner_uri: String,
    pub result_set_summary: ResultSetSummary,
}

/// Payload of `query/message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExecuteMessageParams {
    pub owner_uri: String,
    pub message: ResultMessage,
}

/// Parameters of the `query/save*` family. `resultFormat` selects the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultsRequestParams {
    pub result_format: String,
    pub owner_uri: String,
    pub file_path: String,
    pub batch_index: u32,
    pub result_set_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_start_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_end_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_start_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_end_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_headers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_seperator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultRequestResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
}
