use dataprotocol_types::{
    ObjectMetadata, ScriptOperation, ScriptingCompleteParams, ScriptingParamDetails,
    ScriptingResult,
};

use crate::contracts::scripting;
use crate::convert::to_wire;

provider_handle! {
    /// Script generation for database objects.
    ScriptingProvider
}

impl ScriptingProvider {
    pub async fn script_as_operation(
        &self,
        connection_uri: &str,
        operation: ScriptOperation,
        metadata: &ObjectMetadata,
        details: &ScriptingParamDetails,
    ) -> Option<ScriptingResult> {
        let params = to_wire::scripting_params(connection_uri, operation, metadata, details);
        self.conn.request_optional(scripting::SCRIPT, &params).await
    }

    pub fn on_scripting_complete<F>(&self, handler: F)
    where
        F: Fn(ScriptingCompleteParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(scripting::SCRIPT_COMPLETE, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use dataprotocol_types::MetadataType;
    use serde_json::json;

    #[tokio::test]
    async fn test_script_request_shape() {
        let (conn, mock, _) = recording();
        mock.respond(
            "scripting/script",
            json!({"operationId": "op-1", "script": "DROP TABLE [dbo].[orders]"}),
        );
        let provider = ScriptingProvider::new(conn, "MSSQL");
        let table = ObjectMetadata {
            metadata_type: MetadataType::Table,
            metadata_type_name: "Table".to_string(),
            urn: None,
            name: "orders".to_string(),
            schema: "dbo".to_string(),
        };

        let result = provider
            .script_as_operation(
                "conn://1",
                ScriptOperation::Delete,
                &table,
                &ScriptingParamDetails::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.operation_id, "op-1");

        let sent = mock.requests_for("scripting/script").remove(0).unwrap();
        assert_eq!(sent["ownerURI"], "conn://1");
        assert_eq!(sent["operation"], 4);
        assert_eq!(sent["scriptOptions"]["scriptCreateDrop"], "ScriptDrop");
        assert_eq!(
            sent["scriptingObjects"],
            json!([{"type": "Table", "schema": "dbo", "name": "orders"}])
        );
    }
}
