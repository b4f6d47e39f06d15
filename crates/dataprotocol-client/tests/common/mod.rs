#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dataprotocol_client::{
    ClientConfig, DataProtocolClient, Error, MessageType, ProviderRegistry,
};
use dataprotocol_rpc::MockChannel;
use serde_json::{Value, json};

pub struct Harness {
    pub client: DataProtocolClient,
    pub mock: Arc<MockChannel>,
    pub registry: ProviderRegistry,
    pub failures: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

/// Every area key a full-featured server advertises.
pub fn full_server_capabilities() -> Value {
    json!({
        "capabilities": {
            "connection": {}, "capabilities": {}, "query": {}, "metadata": {},
            "adminServices": {}, "backup": {}, "restore": {}, "objectExplorer": {},
            "scripting": {}, "taskServices": {}, "fileBrowser": {}, "profiler": {}
        }
    })
}

pub fn harness_with(config: ClientConfig) -> Harness {
    let mock = Arc::new(MockChannel::new());
    let registry = ProviderRegistry::new();
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);
    let client = DataProtocolClient::with_failure_hook(
        mock.clone(),
        Arc::new(registry.clone()),
        config,
        Arc::new(move |ty: MessageType, _: &Error| {
            sink.lock().unwrap().push(ty.method.to_string());
        }),
    );
    Harness {
        client,
        mock,
        registry,
        failures,
    }
}

pub fn harness() -> Harness {
    harness_with(ClientConfig::default())
}

/// A harness whose handshake has completed against a full-featured server.
pub async fn started() -> Harness {
    let h = harness();
    h.mock.respond("initialize", full_server_capabilities());
    h.client.start().await.unwrap();
    h
}
