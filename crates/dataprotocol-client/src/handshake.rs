//! Handshake documents: the client capabilities folded from every feature,
//! the server capabilities handed back, and dynamic registration payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `{ "dynamicRegistration": true }` for one capability area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRegistrationCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,
}

/// Client capabilities keyed by area name (`connection`, `query`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientCapabilities(BTreeMap<String, DynamicRegistrationCapability>);

impl ClientCapabilities {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `area`, created empty if absent.
    pub fn ensure(&mut self, area: &str) -> &mut DynamicRegistrationCapability {
        self.0.entry(area.to_string()).or_default()
    }

    #[must_use]
    pub fn get(&self, area: &str) -> Option<&DynamicRegistrationCapability> {
        self.0.get(area)
    }

    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Server capabilities as returned from `initialize`. Kept opaque; features
/// only ask whether their area is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerCapabilities(Map<String, Value>);

impl ServerCapabilities {
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    #[must_use]
    pub fn has_area(&self, area: &str) -> bool {
        self.0.get(area).is_some_and(|v| !v.is_null())
    }

    #[must_use]
    pub fn get(&self, area: &str) -> Option<&Value> {
        self.0.get(area)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub process_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    pub root_uri: Option<String>,
    pub capabilities: ClientCapabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialization_options: Option<Value>,
}

/// Deserialize server capabilities that may be null or missing (both become
/// an empty document)
fn deserialize_null_as_empty_capabilities<'de, D>(
    deserializer: D,
) -> Result<ServerCapabilities, D::Error>
where
    D: Deserializer<'de>,
{
    let map: Option<Map<String, Value>> = Option::deserialize(deserializer)?;
    Ok(ServerCapabilities(map.unwrap_or_default()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    #[serde(default, deserialize_with = "deserialize_null_as_empty_capabilities")]
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializedParams {}

/// One server-requested registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_options: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationParams {
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unregistration {
    pub id: String,
    pub method: String,
}

/// The misspelled `unregisterations` key is what servers send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregistrationParams {
    #[serde(rename = "unregisterations", alias = "unregistrations")]
    pub unregistrations: Vec<Unregistration>,
}
