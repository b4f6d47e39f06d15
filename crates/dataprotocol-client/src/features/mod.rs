//! Per-area providers.
//!
//! Each provider is a cheap clonable handle over the shared connection that
//! turns host calls into typed requests and subscriptions.

macro_rules! provider_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            conn: $crate::connection::ProtocolConnection,
            provider_id: String,
        }

        impl $name {
            pub(crate) fn new(
                conn: $crate::connection::ProtocolConnection,
                provider_id: impl Into<String>,
            ) -> Self {
                Self {
                    conn,
                    provider_id: provider_id.into(),
                }
            }

            #[must_use]
            pub fn provider_id(&self) -> &str {
                &self.provider_id
            }
        }
    };
}

mod admin;
mod backup;
mod capabilities;
mod connection;
mod file_browser;
mod metadata;
mod object_explorer;
mod profiler;
mod query;
mod restore;
mod scripting;
mod tasks;

pub use admin::AdminServicesProvider;
pub use backup::BackupProvider;
pub use capabilities::CapabilitiesProvider;
pub use connection::ConnectionProvider;
pub use file_browser::FileBrowserProvider;
pub use metadata::MetadataProvider;
pub use object_explorer::ObjectExplorerProvider;
pub use profiler::ProfilerProvider;
pub use query::QueryProvider;
pub use restore::RestoreProvider;
pub use scripting::ScriptingProvider;
pub use tasks::TaskServicesProvider;
