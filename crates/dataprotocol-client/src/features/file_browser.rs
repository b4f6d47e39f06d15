use dataprotocol_types::{
    FileBrowserCloseParams, FileBrowserCloseResponse, FileBrowserExpandParams,
    FileBrowserExpandedParams, FileBrowserOpenParams, FileBrowserOpenedParams,
    FileBrowserValidateParams, FileBrowserValidatedParams,
};

use crate::contracts::file_browser;

provider_handle! {
    /// Server-side file browsing for backup and restore paths. Each request
    /// only starts the work; the outcome arrives as a notification.
    FileBrowserProvider
}

impl FileBrowserProvider {
    pub async fn open_file_browser(
        &self,
        owner_uri: &str,
        expand_path: &str,
        file_filters: Vec<String>,
        change_filter: bool,
    ) -> bool {
        let params = FileBrowserOpenParams {
            owner_uri: owner_uri.to_string(),
            expand_path: expand_path.to_string(),
            file_filters,
            change_filter,
        };
        self.conn.request_or_default(file_browser::OPEN, &params).await
    }

    pub async fn expand_folder_node(&self, owner_uri: &str, expand_path: &str) -> bool {
        let params = FileBrowserExpandParams {
            owner_uri: owner_uri.to_string(),
            expand_path: expand_path.to_string(),
        };
        self.conn
            .request_or_default(file_browser::EXPAND, &params)
            .await
    }

    pub async fn validate_file_paths(
        &self,
        owner_uri: &str,
        service_type: &str,
        selected_files: Vec<String>,
    ) -> bool {
        let params = FileBrowserValidateParams {
            owner_uri: owner_uri.to_string(),
            service_type: service_type.to_string(),
            selected_files,
        };
        self.conn
            .request_or_default(file_browser::VALIDATE, &params)
            .await
    }

    pub async fn close_file_browser(&self, owner_uri: &str) -> Option<FileBrowserCloseResponse> {
        let params = FileBrowserCloseParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_optional(file_browser::CLOSE, &params)
            .await
    }

    pub fn on_file_browser_opened<F>(&self, handler: F)
    where
        F: Fn(FileBrowserOpenedParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(file_browser::OPENED, handler);
    }

    pub fn on_folder_node_expanded<F>(&self, handler: F)
    where
        F: Fn(FileBrowserExpandedParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(file_browser::EXPANDED, handler);
    }

    pub fn on_file_paths_validated<F>(&self, handler: F)
    where
        F: Fn(FileBrowserValidatedParams) + Send + Sync + 'static,
    {
        self.conn.on_notification(file_browser::VALIDATED, handler);
    }
}
