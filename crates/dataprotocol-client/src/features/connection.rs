use dataprotocol_types::{
    CancelConnectParams, ChangeDatabaseParams, ChangedConnectionInfo, ConnectionCompleteParams,
    ConnectionInfo, DisconnectParams, LanguageFlavorChangedParams, ListDatabasesParams,
    ListDatabasesResult, RebuildIntelliSenseParams,
};

use crate::contracts::connection;
use crate::convert::{from_wire, to_wire};

provider_handle! {
    /// Connection lifecycle, database switching and IntelliSense cache events.
    ConnectionProvider
}

impl ConnectionProvider {
    pub async fn connect(&self, owner_uri: &str, info: &ConnectionInfo) -> bool {
        let params = to_wire::connect_params(owner_uri, info);
        self.conn.request_or_default(connection::CONNECT, &params).await
    }

    pub async fn disconnect(&self, owner_uri: &str) -> bool {
        let params = DisconnectParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn.request_or_default(connection::DISCONNECT, &params).await
    }

    pub async fn cancel_connect(&self, owner_uri: &str) -> bool {
        let params = CancelConnectParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_or_default(connection::CANCEL_CONNECT, &params)
            .await
    }

    pub async fn change_database(&self, owner_uri: &str, new_database: &str) -> bool {
        let params = ChangeDatabaseParams {
            owner_uri: owner_uri.to_string(),
            new_database: new_database.to_string(),
        };
        self.conn
            .request_or_default(connection::CHANGE_DATABASE, &params)
            .await
    }

    pub async fn list_databases(&self, owner_uri: &str) -> ListDatabasesResult {
        let params = ListDatabasesParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .request_or_default(connection::LIST_DATABASES, &params)
            .await
    }

    pub async fn rebuild_intellisense_cache(&self, owner_uri: &str) {
        let params = RebuildIntelliSenseParams {
            owner_uri: owner_uri.to_string(),
        };
        self.conn
            .notify(connection::REBUILD_INTELLISENSE, &params)
            .await;
    }

    pub async fn change_language_flavor(&self, uri: &str, language: &str, flavor: &str) {
        let params = LanguageFlavorChangedParams {
            uri: uri.to_string(),
            language: language.to_string(),
            flavor: flavor.to_string(),
        };
        self.conn
            .notify(connection::LANGUAGE_FLAVOR_CHANGED, &params)
            .await;
    }

    pub fn on_connection_complete<F>(&self, handler: F)
    where
        F: Fn(ConnectionCompleteParams) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(connection::CONNECTION_COMPLETE, handler);
    }

    pub fn on_connection_changed<F>(&self, handler: F)
    where
        F: Fn(ChangedConnectionInfo) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(connection::CONNECTION_CHANGED, move |params| {
                handler(from_wire::changed_connection_info(params));
            });
    }

    /// Called with the owner URI whose IntelliSense cache finished building.
    pub fn on_intellisense_cache_complete<F>(&self, handler: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(connection::INTELLISENSE_READY, move |params| {
                handler(from_wire::intellisense_ready(params));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_connect_sends_nested_options() {
        let (conn, mock, _) = recording();
        mock.respond("connection/connect", json!(true));
        let provider = ConnectionProvider::new(conn, "MSSQL");

        let mut info = ConnectionInfo::default();
        info.options.insert("server".to_string(), json!("localhost"));
        assert!(provider.connect("conn://1", &info).await);

        assert_eq!(
            mock.requests_for("connection/connect"),
            vec![Some(json!({
                "ownerUri": "conn://1",
                "connection": {"options": {"server": "localhost"}}
            }))]
        );
    }

    #[tokio::test]
    async fn test_list_databases_defaults_to_empty() {
        let (conn, _mock, failures) = recording();
        let provider = ConnectionProvider::new(conn, "MSSQL");

        let result = provider.list_databases("conn://1").await;
        assert!(result.database_names.is_empty());
        assert_eq!(*failures.lock().unwrap(), vec!["connection/listdatabases"]);
    }

    #[tokio::test]
    async fn test_language_flavor_is_a_notification() {
        let (conn, mock, _) = recording();
        let provider = ConnectionProvider::new(conn, "MSSQL");

        provider
            .change_language_flavor("file:///a.sql", "sql", "MSSQL")
            .await;

        assert!(mock.requests().is_empty());
        assert_eq!(
            mock.notifications(),
            vec![(
                "connection/languageflavorchanged".to_string(),
                Some(json!({"uri": "file:///a.sql", "language": "sql", "flavor": "MSSQL"}))
            )]
        );
    }

    #[test]
    fn test_connection_changed_is_reshaped() {
        let (conn, mock, _) = recording();
        let provider = ConnectionProvider::new(conn, "MSSQL");
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        provider.on_connection_changed(move |info| *sink.lock().unwrap() = Some(info));

        mock.emit(
            "connection/connectionchanged",
            json!({"ownerUri": "conn://1", "connection": {"serverName": "db1", "databaseName": "sales"}}),
        );

        let info = seen.lock().unwrap().clone().unwrap();
        assert_eq!(info.connection_uri, "conn://1");
        assert_eq!(info.connection.database_name, "sales");
    }

    #[test]
    fn test_intellisense_ready_delivers_uri() {
        let (conn, mock, _) = recording();
        let provider = ConnectionProvider::new(conn, "MSSQL");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        provider.on_intellisense_cache_complete(move |uri| sink.lock().unwrap().push(uri));

        mock.emit(
            "textDocument/intelliSenseReady",
            json!({"ownerUri": "file:///a.sql"}),
        );
        assert_eq!(*seen.lock().unwrap(), vec!["file:///a.sql"]);
    }
}
