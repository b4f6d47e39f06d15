use dataprotocol_types::{DataProtocolClientCapabilities, DataProtocolServerCapabilities};

use crate::contracts::capabilities;
use crate::convert::from_wire;

provider_handle! {
    /// Capability discovery through `capabilities/list`.
    CapabilitiesProvider
}

impl CapabilitiesProvider {
    /// `None` when the server could not be asked; the failure is logged.
    pub async fn get_server_capabilities(
        &self,
        client: &DataProtocolClientCapabilities,
    ) -> Option<DataProtocolServerCapabilities> {
        self.conn
            .request_optional(capabilities::LIST, client)
            .await
            .map(from_wire::server_capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::test_support::recording;
    use serde_json::json;

    fn client() -> DataProtocolClientCapabilities {
        DataProtocolClientCapabilities {
            host_name: "dataprotocol".to_string(),
            host_version: "1.0".to_string(),
        }
    }

    #[tokio::test]
    async fn test_capabilities_unwrapped() {
        let (conn, mock, _) = recording();
        mock.respond(
            "capabilities/list",
            json!({"capabilities": {"protocolVersion": "1.0", "providerName": "MSSQL"}}),
        );
        let provider = CapabilitiesProvider::new(conn, "MSSQL");

        let caps = provider.get_server_capabilities(&client()).await.unwrap();
        assert_eq!(caps.provider_name, "MSSQL");
        assert_eq!(
            mock.requests_for("capabilities/list"),
            vec![Some(json!({"hostName": "dataprotocol", "hostVersion": "1.0"}))]
        );
    }

    #[tokio::test]
    async fn test_failure_resolves_none() {
        let (conn, _mock, failures) = recording();
        let provider = CapabilitiesProvider::new(conn, "MSSQL");

        assert!(provider.get_server_capabilities(&client()).await.is_none());
        assert_eq!(failures.lock().unwrap().len(), 1);
    }
}
