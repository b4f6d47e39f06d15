//! Query execution and edit-data sessions.
//!
//! Every call here propagates failures to the caller after logging them.

use dataprotocol_types::{
    EditCellResult, EditCreateRowResult, EditRowParams, EditRevertCellParams, EditSessionParams,
    EditSessionReadyParams, EditSubsetParams, EditSubsetResult, EditUpdateCellParams,
    ExecutionPlanOptions, QueryCancelResult, QueryExecuteBatchParams, QueryExecuteCompleteParams,
    QueryExecuteMessageParams, QueryExecuteResultSetCompleteParams, QueryExecuteStatementParams,
    QueryExecuteStringParams, QueryExecuteSubsetParams, QueryExecuteSubsetResult,
    QueryOwnerParams, SaveResultRequestResult, SaveResultsRequestParams, SelectionData,
    SimpleExecuteParams, SimpleExecuteResult,
};

use crate::contracts::query::{self, SaveResultsType};
use crate::convert::to_wire::{self, EditTarget};
use crate::error::Error;
use crate::Result;

/// Route a save request by its result format.
fn save_results_type(format: &str) -> Result<SaveResultsType> {
    match format {
        "csv" => Ok(query::SAVE_CSV),
        "json" => Ok(query::SAVE_JSON),
        "excel" => Ok(query::SAVE_EXCEL),
        other => Err(Error::UnsupportedSaveFormat(other.to_string())),
    }
}

fn owner(owner_uri: &str) -> QueryOwnerParams {
    QueryOwnerParams {
        owner_uri: owner_uri.to_string(),
    }
}

fn session(owner_uri: &str) -> EditSessionParams {
    EditSessionParams {
        owner_uri: owner_uri.to_string(),
    }
}

fn row(owner_uri: &str, row_id: i64) -> EditRowParams {
    EditRowParams {
        owner_uri: owner_uri.to_string(),
        row_id,
    }
}

provider_handle! {
    QueryProvider
}

impl QueryProvider {
    /// Execute the selected part of a document, or all of it.
    ///
    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn run_query(
        &self,
        owner_uri: &str,
        selection: Option<SelectionData>,
        plan: Option<ExecutionPlanOptions>,
    ) -> Result<()> {
        let params = to_wire::query_execute_params(owner_uri, selection, plan);
        self.conn
            .request_or_propagate(query::EXECUTE_DOCUMENT_SELECTION, &params)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn run_query_statement(&self, owner_uri: &str, line: u32, column: u32) -> Result<()> {
        let params = QueryExecuteStatementParams {
            owner_uri: owner_uri.to_string(),
            line,
            column: Some(column),
        };
        self.conn
            .request_or_propagate(query::EXECUTE_DOCUMENT_STATEMENT, &params)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn run_query_string(&self, owner_uri: &str, query_string: &str) -> Result<()> {
        let params = QueryExecuteStringParams {
            owner_uri: owner_uri.to_string(),
            query: query_string.to_string(),
        };
        self.conn
            .request_or_propagate(query::EXECUTE_STRING, &params)
            .await?;
        Ok(())
    }

    /// Execute and wait for the rows in a single round trip.
    ///
    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn run_query_and_return(
        &self,
        owner_uri: &str,
        query_string: &str,
    ) -> Result<SimpleExecuteResult> {
        let params = SimpleExecuteParams {
            owner_uri: owner_uri.to_string(),
            query_string: query_string.to_string(),
        };
        self.conn
            .request_or_propagate(query::SIMPLE_EXECUTE, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn cancel_query(&self, owner_uri: &str) -> Result<QueryCancelResult> {
        self.conn
            .request_or_propagate(query::CANCEL, &owner(owner_uri))
            .await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn dispose_query(&self, owner_uri: &str) -> Result<()> {
        self.conn
            .request_or_propagate(query::DISPOSE, &owner(owner_uri))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn get_query_rows(
        &self,
        params: &QueryExecuteSubsetParams,
    ) -> Result<QueryExecuteSubsetResult> {
        self.conn.request_or_propagate(query::SUBSET, params).await
    }

    /// Save a result set to disk as `csv`, `json` or `excel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSaveFormat`] without contacting the
    /// server for any other format, otherwise the logged transport or
    /// server error.
    pub async fn save_results(
        &self,
        params: &SaveResultsRequestParams,
    ) -> Result<SaveResultRequestResult> {
        let ty = save_results_type(&params.result_format)?;
        self.conn.request_or_propagate(ty, params).await
    }

    pub fn on_query_complete<F>(&self, handler: F)
    where
        F: Fn(QueryExecuteCompleteParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::COMPLETE, handler);
    }

    pub fn on_batch_start<F>(&self, handler: F)
    where
        F: Fn(QueryExecuteBatchParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::BATCH_START, handler);
    }

    pub fn on_batch_complete<F>(&self, handler: F)
    where
        F: Fn(QueryExecuteBatchParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::BATCH_COMPLETE, handler);
    }

    pub fn on_result_set_complete<F>(&self, handler: F)
    where
        F: Fn(QueryExecuteResultSetCompleteParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::RESULT_SET_COMPLETE, handler);
    }

    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(QueryExecuteMessageParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::MESSAGE, handler);
    }

    /// Open an edit session on a table or view. Readiness arrives through
    /// [`Self::on_edit_session_ready`].
    ///
    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn initialize_edit(
        &self,
        owner_uri: &str,
        target: &EditTarget<'_>,
        row_limit: Option<u64>,
        query_string: Option<&str>,
    ) -> Result<()> {
        let params = to_wire::edit_initialize_params(owner_uri, target, row_limit, query_string);
        self.conn
            .request_or_propagate(query::EDIT_INITIALIZE, &params)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn commit_edit(&self, owner_uri: &str) -> Result<()> {
        self.conn
            .request_or_propagate(query::EDIT_COMMIT, &session(owner_uri))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn create_row(&self, owner_uri: &str) -> Result<EditCreateRowResult> {
        self.conn
            .request_or_propagate(query::EDIT_CREATE_ROW, &session(owner_uri))
            .await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn delete_row(&self, owner_uri: &str, row_id: i64) -> Result<()> {
        self.conn
            .request_or_propagate(query::EDIT_DELETE_ROW, &row(owner_uri, row_id))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn dispose_edit(&self, owner_uri: &str) -> Result<()> {
        self.conn
            .request_or_propagate(query::EDIT_DISPOSE, &session(owner_uri))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn revert_cell(
        &self,
        owner_uri: &str,
        row_id: i64,
        column_id: i64,
    ) -> Result<EditCellResult> {
        let params = EditRevertCellParams {
            owner_uri: owner_uri.to_string(),
            row_id,
            column_id,
        };
        self.conn
            .request_or_propagate(query::EDIT_REVERT_CELL, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn revert_row(&self, owner_uri: &str, row_id: i64) -> Result<()> {
        self.conn
            .request_or_propagate(query::EDIT_REVERT_ROW, &row(owner_uri, row_id))
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn update_cell(
        &self,
        owner_uri: &str,
        row_id: i64,
        column_id: i64,
        new_value: &str,
    ) -> Result<EditCellResult> {
        let params = EditUpdateCellParams {
            owner_uri: owner_uri.to_string(),
            row_id,
            column_id,
            new_value: new_value.to_string(),
        };
        self.conn
            .request_or_propagate(query::EDIT_UPDATE_CELL, &params)
            .await
    }

    /// # Errors
    ///
    /// Returns the logged transport or server error.
    pub async fn get_edit_rows(
        &self,
        owner_uri: &str,
        row_start_index: u64,
        row_count: u64,
    ) -> Result<EditSubsetResult> {
        let params = EditSubsetParams {
            owner_uri: owner_uri.to_string(),
            row_start_index,
            row_count,
        };
        self.conn
            .request_or_propagate(query::EDIT_SUBSET, &params)
            .await
    }

    pub fn on_edit_session_ready<F>(&self, handler: F)
    where
        F: Fn(EditSessionReadyParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(query::EDIT_SESSION_READY, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use dataprotocol_rpc::RpcError;
    use serde_json::json;

    fn save(format: &str) -> SaveResultsRequestParams {
        SaveResultsRequestParams {
            result_format: format.to_string(),
            owner_uri: "q://1".to_string(),
            file_path: "/tmp/out".to_string(),
            ..SaveResultsRequestParams::default()
        }
    }

    #[tokio::test]
    async fn test_save_routes_by_format() {
        let (conn, mock, _) = recording();
        for method in ["query/saveCsv", "query/saveJson", "query/saveExcel"] {
            mock.respond(method, json!({}));
        }
        let provider = QueryProvider::new(conn, "MSSQL");

        for format in ["csv", "json", "excel"] {
            provider.save_results(&save(format)).await.unwrap();
        }

        let methods: Vec<String> = mock.requests().into_iter().map(|(m, _)| m).collect();
        assert_eq!(methods, vec!["query/saveCsv", "query/saveJson", "query/saveExcel"]);
    }

    #[tokio::test]
    async fn test_unknown_save_format_sends_nothing() {
        let (conn, mock, failures) = recording();
        let provider = QueryProvider::new(conn, "MSSQL");

        for format in ["xml", "CSV", ""] {
            let err = provider.save_results(&save(format)).await.unwrap_err();
            assert!(matches!(err, Error::UnsupportedSaveFormat(ref f) if f == format));
        }
        assert!(mock.requests().is_empty());
        assert!(failures.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_query_propagates_and_logs_once() {
        let (conn, mock, failures) = recording();
        mock.fail(
            "query/executeDocumentSelection",
            RpcError::internal_error("no connection"),
        );
        let provider = QueryProvider::new(conn, "MSSQL");

        let err = provider.run_query("q://1", None, None).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(
            *failures.lock().unwrap(),
            vec!["query/executeDocumentSelection"]
        );
        assert_eq!(
            mock.requests_for("query/executeDocumentSelection"),
            vec![Some(json!({"ownerUri": "q://1", "executionPlanOptions": {}}))]
        );
    }

    #[tokio::test]
    async fn test_initialize_edit_params() {
        let (conn, mock, _) = recording();
        mock.respond("edit/initialize", json!({}));
        let provider = QueryProvider::new(conn, "MSSQL");
        let target = EditTarget {
            schema_name: "dbo",
            object_name: "orders",
            object_type: "Table",
        };

        provider
            .initialize_edit("edit://1", &target, Some(200), None)
            .await
            .unwrap();

        let sent = mock.requests_for("edit/initialize").remove(0).unwrap();
        assert_eq!(sent["filters"], json!({"LimitResults": 200}));
        assert_eq!(sent["schemaName"], "dbo");
    }

    #[tokio::test]
    async fn test_edit_failure_is_propagated() {
        let (conn, _mock, failures) = recording();
        let provider = QueryProvider::new(conn, "MSSQL");

        assert!(provider.update_cell("edit://1", 0, 2, "42").await.is_err());
        assert_eq!(*failures.lock().unwrap(), vec!["edit/updateCell"]);
    }

    #[tokio::test]
    async fn test_simple_execute_result() {
        let (conn, mock, _) = recording();
        mock.respond(
            "query/simpleexecute",
            json!({
                "rowCount": 1,
                "columnInfo": [{"columnName": "answer"}],
                "rows": [[{"displayValue": "42", "isNull": false}]]
            }),
        );
        let provider = QueryProvider::new(conn, "MSSQL");

        let result = provider
            .run_query_and_return("q://1", "select 42 as answer")
            .await
            .unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.rows[0][0].display_value, "42");
    }
}
