use dataprotocol_types::{
    Options, RestoreConfigInfo, RestoreConfigInfoRequestParams, RestoreParams,
    RestorePlanResponse, RestoreResponse, TaskExecutionMode,
};

use crate::contracts::restore;
use crate::convert::from_wire;

fn restore_params(owner_uri: &str, options: Options, mode: TaskExecutionMode) -> RestoreParams {
    RestoreParams {
        owner_uri: owner_uri.to_string(),
        options,
        task_execution_mode: mode,
    }
}

provider_handle! {
    /// Restore plans and restore execution.
    RestoreProvider
}

impl RestoreProvider {
    pub async fn restore(
        &self,
        owner_uri: &str,
        options: Options,
        mode: TaskExecutionMode,
    ) -> Option<RestoreResponse> {
        let params = restore_params(owner_uri, options, mode);
        self.conn.request_optional(restore::RESTORE, &params).await
    }

    pub async fn get_restore_plan(
        &self,
        owner_uri: &str,
        options: Options,
        mode: TaskExecutionMode,
    ) -> Option<RestorePlanResponse> {
        let params = restore_params(owner_uri, options, mode);
        self.conn
            .request_optional(restore::RESTORE_PLAN, &params)
            .await
    }

    pub async fn cancel_restore_plan(
        &self,
        owner_uri: &str,
        options: Options,
        mode: TaskExecutionMode,
    ) -> bool {
        let params = restore_params(owner_uri, options, mode);
        self.conn
            .request_or_default(restore::CANCEL_RESTORE_PLAN, &params)
            .await
    }

    pub async fn get_restore_config_info(&self, owner_uri: &str) -> Option<RestoreConfigInfo> {
        let params = RestoreConfigInfoRequestParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_optional(restore::RESTORE_CONFIG_INFO, &params)
            .await
            .map(from_wire::restore_config_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use serde_json::json;

    #[tokio::test]
    async fn test_cancel_plan_defaults_false() {
        let (conn, _mock, failures) = recording();
        let provider = RestoreProvider::new(conn, "MSSQL");

        assert!(
            !provider
                .cancel_restore_plan("conn://1", Options::new(), TaskExecutionMode::Execute)
                .await
        );
        assert_eq!(*failures.lock().unwrap(), vec!["restore/cancelrestoreplan"]);
    }

    #[tokio::test]
    async fn test_restore_plan_decodes() {
        let (conn, mock, _) = recording();
        mock.respond(
            "restore/restoreplan",
            json!({"sessionId": "r1", "canRestore": true, "databaseNamesFromBackupSets": ["sales"]}),
        );
        let provider = RestoreProvider::new(conn, "MSSQL");

        let plan = provider
            .get_restore_plan("conn://1", Options::new(), TaskExecutionMode::Execute)
            .await
            .unwrap();
        assert!(plan.can_restore);
        assert_eq!(plan.database_names_from_backup_sets, vec!["sales"]);
    }

    #[tokio::test]
    async fn test_config_info_rewrapped() {
        let (conn, mock, _) = recording();
        mock.respond(
            "restore/restoreconfiginfo",
            json!({"configInfo": {"dataFileFolder": "/var/opt/data"}}),
        );
        let provider = RestoreProvider::new(conn, "MSSQL");

        let info = provider.get_restore_config_info("conn://1").await.unwrap();
        assert_eq!(info.config_info["dataFileFolder"], "/var/opt/data");
    }
}
