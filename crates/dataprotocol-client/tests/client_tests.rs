mod common;

use std::collections::HashSet;

use common::{harness, harness_with, started};
use dataprotocol_client::handshake::{
    Registration, RegistrationParams, Unregistration, UnregistrationParams,
};
use dataprotocol_client::{
    ALL_MESSAGE_TYPES, ClientConfig, ClientState, Error, FeatureKind, MessageType,
    MetadataProvider, ProfilerProvider, QueryProvider,
};
use dataprotocol_rpc::{INVALID_PARAMS, RpcError};
use serde_json::json;

#[test]
fn test_features_partition_the_contract() {
    let mut seen = HashSet::new();
    let mut total = 0;
    for kind in FeatureKind::ALL {
        for ty in kind.message_types() {
            assert!(seen.insert(*ty), "{ty} owned twice");
            total += 1;
        }
    }
    let all: HashSet<MessageType> = ALL_MESSAGE_TYPES.iter().copied().collect();
    assert_eq!(seen, all);
    assert_eq!(total, ALL_MESSAGE_TYPES.len());
}

#[test]
fn test_client_capabilities_document() {
    let h = harness();
    let caps = h.client.client_capabilities();

    let areas: HashSet<&str> = caps.areas().collect();
    assert_eq!(areas.len(), 12);
    for kind in FeatureKind::ALL {
        assert!(areas.contains(kind.area()), "missing {}", kind.area());
        assert_eq!(
            caps.get(kind.area()).unwrap().dynamic_registration,
            Some(true)
        );
    }
}

#[tokio::test]
async fn test_handshake_sequence() {
    let h = started().await;

    assert_eq!(h.client.state(), ClientState::Active);
    assert_eq!(h.registry.len(), 12);

    let init = h.mock.requests_for("initialize").remove(0).unwrap();
    assert_eq!(init["clientInfo"]["name"], "dataprotocol");
    assert_eq!(
        init["capabilities"]["connection"],
        json!({"dynamicRegistration": true})
    );
    assert_eq!(
        h.mock.notifications(),
        vec![("initialized".to_string(), Some(json!({})))]
    );
}

#[tokio::test]
async fn test_failed_handshake_can_retry() {
    let h = harness();
    h.mock
        .fail("initialize", RpcError::internal_error("not ready"));

    let err = h.client.start().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(h.client.state(), ClientState::Constructed);
    assert_eq!(h.failures(), vec!["initialize"]);
    assert!(h.registry.is_empty());
    assert!(h.mock.notifications().is_empty());

    h.mock
        .respond("initialize", common::full_server_capabilities());
    h.client.start().await.unwrap();
    assert_eq!(h.client.state(), ClientState::Active);
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let h = started().await;
    let err = h.client.start().await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidState {
            expected: "Constructed",
            found: "Active"
        }
    ));
    assert_eq!(h.mock.requests_for("initialize").len(), 1);
}

#[tokio::test]
async fn test_lenient_gating_registers_everything() {
    let h = harness();
    h.mock
        .respond("initialize", json!({"capabilities": {"connection": {}}}));
    h.client.start().await.unwrap();
    assert_eq!(h.registry.len(), 12);
}

#[tokio::test]
async fn test_null_server_capabilities_still_start() {
    let h = harness();
    h.mock.respond("initialize", json!({"capabilities": null}));

    let capabilities = h.client.start().await.unwrap();
    assert!(capabilities.as_map().is_empty());
    assert_eq!(h.client.state(), ClientState::Active);
    assert_eq!(h.registry.len(), 12);
}

#[tokio::test]
async fn test_strict_gating_skips_missing_areas() {
    let h = harness_with(ClientConfig {
        require_server_capabilities: true,
        ..ClientConfig::default()
    });
    h.mock.respond(
        "initialize",
        json!({"capabilities": {"connection": {}, "query": {}, "profiler": null}}),
    );
    h.client.start().await.unwrap();

    assert_eq!(h.registry.len(), 2);
    assert!(h.registry.get::<QueryProvider>().is_some());
    assert!(h.registry.get::<ProfilerProvider>().is_none());
    assert_eq!(h.client.state(), ClientState::Active);
}

#[tokio::test]
async fn test_dispose_unregisters_and_closes() {
    let h = started().await;

    h.client.dispose().await;
    assert_eq!(h.client.state(), ClientState::Disposed);
    assert!(h.registry.is_empty());
    assert!(h.mock.is_closed());

    h.client.dispose().await;
    assert_eq!(h.client.state(), ClientState::Disposed);
    assert!(h.client.start().await.is_err());
}

#[tokio::test]
async fn test_features_refuse_registration_after_dispose() {
    let h = started().await;
    h.client.dispose().await;

    let capabilities = dataprotocol_client::ServerCapabilities::default();
    for feature in h.client.features() {
        assert!(matches!(
            feature.initialize(&capabilities),
            Err(Error::InvalidState { .. })
        ));
    }
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_dispose_before_start() {
    let h = harness();
    h.client.dispose().await;
    assert_eq!(h.client.state(), ClientState::Disposed);
    assert!(h.mock.is_closed());
}

#[tokio::test]
async fn test_server_registration_routes_to_owner() {
    let h = started().await;

    let reply = h
        .mock
        .server_request(
            "client/registerCapability",
            json!({"registrations": [{"id": "meta-2", "method": "metadata/list"}]}),
        )
        .await
        .unwrap();
    assert_eq!(reply.unwrap(), serde_json::Value::Null);

    let metadata = h.client.feature(FeatureKind::Metadata).unwrap();
    assert!(metadata.registration_ids().contains(&"meta-2".to_string()));
    assert_eq!(h.registry.len(), 13);

    let reply = h
        .mock
        .server_request(
            "client/unregisterCapability",
            json!({"unregisterations": [{"id": "meta-2", "method": "metadata/list"}]}),
        )
        .await
        .unwrap();
    assert!(reply.is_ok());
    assert_eq!(h.registry.len(), 12);
}

#[tokio::test]
async fn test_unknown_registration_method_is_an_error() {
    let h = started().await;

    let err = h
        .mock
        .server_request(
            "client/registerCapability",
            json!({"registrations": [
                {"id": "ok", "method": "query/cancel"},
                {"id": "bad", "method": "workspace/symbol"}
            ]}),
        )
        .await
        .unwrap()
        .unwrap_err();
    assert_eq!(err.code, INVALID_PARAMS);
    assert_eq!(h.registry.len(), 12);
}

#[tokio::test]
async fn test_registration_before_start_is_rejected() {
    let h = harness();
    let params = RegistrationParams {
        registrations: vec![Registration {
            id: "r1".to_string(),
            method: "tasks/listtasks".to_string(),
            register_options: None,
        }],
    };
    assert!(matches!(
        h.client.register_capability(&params),
        Err(Error::InvalidState { .. })
    ));
}

#[tokio::test]
async fn test_unregister_unknown_id_is_noop() {
    let h = started().await;
    h.client.unregister_capability(&UnregistrationParams {
        unregistrations: vec![Unregistration {
            id: "never-registered".to_string(),
            method: "query/cancel".to_string(),
        }],
    });
    assert_eq!(h.registry.len(), 12);
}

#[tokio::test]
async fn test_wrong_feature_registration_sends_nothing() {
    let h = harness();
    let query = h.client.feature(FeatureKind::Query).unwrap();

    let err = query
        .register(
            &[MessageType::request("metadata/list")],
            "r1".to_string(),
        )
        .unwrap_err();
    assert!(err.to_string().starts_with("Register called on wrong feature"));
    assert!(h.mock.requests().is_empty());
    assert!(h.mock.notifications().is_empty());
    assert!(h.registry.get::<MetadataProvider>().is_none());
}
