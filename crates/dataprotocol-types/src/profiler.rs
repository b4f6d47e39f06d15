//! Profiler shapes (`profiler/*`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Options;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProfilingParams {
    pub owner_uri: String,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopProfilingParams {
    pub owner_uri: String,
}

/// Result of `profiler/start` and `profiler/stop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilingResponse {
    pub succeeded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub type StartProfilingResponse = ProfilingResponse;
pub type StopProfilingResponse = ProfilingResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilerEvent {
    pub name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// Payload of `profiler/eventsavailable` as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilerEventsAvailableParams {
    pub owner_uri: String,
    #[serde(default, deserialize_with = "crate::deserialize_null_as_empty_vec")]
    pub events: Vec<ProfilerEvent>,
}

/// Profiler events as handed to the host, keyed by session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilerSessionEvents {
    pub session_id: String,
    pub events: Vec<ProfilerEvent>,
}
