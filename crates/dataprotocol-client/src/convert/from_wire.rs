//! Wire results and notification payloads to host values.

use dataprotocol_types::{
    BackupConfigInfo, BackupConfigInfoResponse, CapabilitiesResult, ChangedConnectionInfo,
    ConnectionChangedParams, DataProtocolServerCapabilities, DatabaseInfo,
    DefaultDatabaseInfoResponse, GetDatabaseInfoResponse, IntelliSenseReadyParams,
    MetadataQueryResult, MetadataType, ObjectMetadata, ProfilerEventsAvailableParams,
    ProfilerSessionEvents, ProviderMetadata, RestoreConfigInfo, RestoreConfigInfoResponse,
    WireObjectMetadata,
};

/// Display type name for an object. A non-empty name from the server wins;
/// an empty one counts as unset, as in the scripting defaults.
#[must_use]
pub fn metadata_type_name(metadata: &WireObjectMetadata) -> String {
    if let Some(name) = metadata.metadata_type_name.as_ref().filter(|n| !n.is_empty()) {
        return name.clone();
    }
    match metadata.metadata_type {
        MetadataType::View => "View",
        MetadataType::SProc => "StoredProcedure",
        MetadataType::Function => "Function",
        MetadataType::Table => "Table",
    }
    .to_string()
}

#[must_use]
pub fn object_metadata(metadata: WireObjectMetadata) -> ObjectMetadata {
    let metadata_type_name = metadata_type_name(&metadata);
    ObjectMetadata {
        metadata_type: metadata.metadata_type,
        metadata_type_name,
        urn: metadata.urn,
        name: metadata.name,
        schema: metadata.schema,
    }
}

#[must_use]
pub fn provider_metadata(result: MetadataQueryResult) -> ProviderMetadata {
    ProviderMetadata {
        object_metadata: result.metadata.into_iter().map(object_metadata).collect(),
    }
}

#[must_use]
pub fn server_capabilities(result: CapabilitiesResult) -> DataProtocolServerCapabilities {
    result.capabilities
}

/// Hosts only want the document URI that became ready.
#[must_use]
pub fn intellisense_ready(params: IntelliSenseReadyParams) -> String {
    params.owner_uri
}

#[must_use]
pub fn changed_connection_info(params: ConnectionChangedParams) -> ChangedConnectionInfo {
    ChangedConnectionInfo {
        connection_uri: params.owner_uri,
        connection: params.connection,
    }
}

#[must_use]
pub fn profiler_session_events(params: ProfilerEventsAvailableParams) -> ProfilerSessionEvents {
    ProfilerSessionEvents {
        session_id: params.owner_uri,
        events: params.events,
    }
}

#[must_use]
pub fn default_database_info(response: DefaultDatabaseInfoResponse) -> DatabaseInfo {
    response.default_database_info
}

#[must_use]
pub fn database_info(response: GetDatabaseInfoResponse) -> DatabaseInfo {
    response.database_info
}

#[must_use]
pub fn backup_config_info(response: BackupConfigInfoResponse) -> BackupConfigInfo {
    response.backup_config_info
}

#[must_use]
pub fn restore_config_info(response: RestoreConfigInfoResponse) -> RestoreConfigInfo {
    RestoreConfigInfo {
        config_info: response.config_info,
    }
}
