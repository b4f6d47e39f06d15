use dataprotocol_types::{
    CloseSessionParams, CloseSessionResponse, ConnectionInfo, CreateSessionResponse, ExpandParams,
    ExpandResponse, SessionCreatedParameters,
};

use crate::contracts::object_explorer;
use crate::convert::to_wire;

fn expand_params(session_id: &str, node_path: &str) -> ExpandParams {
    ExpandParams {
        session_id: session_id.to_string(),
        node_path: node_path.to_string(),
    }
}

provider_handle! {
    /// Object explorer sessions. Results of `create_new_session` and
    /// `expand_node` arrive later as notifications.
    ObjectExplorerProvider
}

impl ObjectExplorerProvider {
    pub async fn create_new_session(&self, info: &ConnectionInfo) -> Option<CreateSessionResponse> {
        let params = to_wire::connection_details(info);
        self.conn
            .request_optional(object_explorer::CREATE_SESSION, &params)
            .await
    }

    pub async fn expand_node(&self, session_id: &str, node_path: &str) -> bool {
        self.conn
            .request_or_default(object_explorer::EXPAND, &expand_params(session_id, node_path))
            .await
    }

    pub async fn refresh_node(&self, session_id: &str, node_path: &str) -> bool {
        self.conn
            .request_or_default(object_explorer::REFRESH, &expand_params(session_id, node_path))
            .await
    }

    pub async fn close_session(&self, session_id: &str) -> Option<CloseSessionResponse> {
        let params = CloseSessionParams {
            session_id: session_id.to_string(),
        };
        self.conn
            .request_optional(object_explorer::CLOSE_SESSION, &params)
            .await
    }

    pub fn on_session_created<F>(&self, handler: F)
    where
        F: Fn(SessionCreatedParameters) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(object_explorer::SESSION_CREATED, handler);
    }

    pub fn on_expand_completed<F>(&self, handler: F)
    where
        F: Fn(ExpandResponse) + Send + Sync + 'static,
    {
        self.conn
            .on_notification(object_explorer::EXPAND_COMPLETED, handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_create_session_sends_bare_details() {
        let (conn, mock, _) = recording();
        mock.respond("objectexplorer/createsession", json!({"sessionId": "oe-1"}));
        let provider = ObjectExplorerProvider::new(conn, "MSSQL");

        let mut info = ConnectionInfo::default();
        info.options.insert("server".to_string(), json!("db1"));
        let response = provider.create_new_session(&info).await.unwrap();

        assert_eq!(response.session_id, "oe-1");
        assert_eq!(
            mock.requests_for("objectexplorer/createsession"),
            vec![Some(json!({"options": {"server": "db1"}}))]
        );
    }

    #[tokio::test]
    async fn test_expand_failure_is_false() {
        let (conn, _mock, failures) = recording();
        let provider = ObjectExplorerProvider::new(conn, "MSSQL");

        assert!(!provider.expand_node("oe-1", "db1/Databases").await);
        assert_eq!(*failures.lock().unwrap(), vec!["objectexplorer/expand"]);
    }

    #[test]
    fn test_expand_completed_payload() {
        let (conn, mock, _) = recording();
        let provider = ObjectExplorerProvider::new(conn, "MSSQL");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        provider.on_expand_completed(move |response| sink.lock().unwrap().push(response));

        mock.emit(
            "objectexplorer/expandCompleted",
            json!({
                "sessionId": "oe-1",
                "nodePath": "db1/Databases",
                "nodes": [{"nodePath": "db1/Databases/sales", "nodeType": "Database", "label": "sales"}]
            }),
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].nodes[0].label, "sales");
    }
}
