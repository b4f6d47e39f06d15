use dataprotocol_types::{
    BackupConfigInfo, BackupParams, BackupResponse, DefaultDatabaseInfoParams, Options,
    TaskExecutionMode,
};

use crate::contracts::backup;
use crate::convert::from_wire;

provider_handle! {
    BackupProvider
}

impl BackupProvider {
    pub async fn backup(
        &self,
        owner_uri: &str,
        backup_info: Options,
        mode: TaskExecutionMode,
    ) -> Option<BackupResponse> {
        let params = BackupParams {
            owner_uri: owner_uri.to_string(),
            backup_info,
            task_execution_mode: mode,
        };
        self.conn.request_optional(backup::BACKUP, &params).await
    }

    pub async fn get_backup_config_info(&self, owner_uri: &str) -> Option<BackupConfigInfo> {
        let params = DefaultDatabaseInfoParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_optional(backup::BACKUP_CONFIG_INFO, &params)
            .await
            .map(from_wire::backup_config_info)
    }
}
