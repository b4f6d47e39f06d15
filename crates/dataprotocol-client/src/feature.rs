//! Features: one per protocol area, each owning a fixed set of message types
//! and the provider registrations made for them.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::connection::ProtocolConnection;
use crate::contracts::{self, MessageType};
use crate::error::Error;
use crate::features::{
    AdminServicesProvider, BackupProvider, CapabilitiesProvider, ConnectionProvider,
    FileBrowserProvider, MetadataProvider, ObjectExplorerProvider, ProfilerProvider,
    QueryProvider, RestoreProvider, ScriptingProvider, TaskServicesProvider,
};
use crate::handshake::{ClientCapabilities, ServerCapabilities};
use crate::host::{Disposable, Provider, ProviderHost};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Capabilities,
    Connection,
    Query,
    Metadata,
    AdminServices,
    Backup,
    Restore,
    ObjectExplorer,
    Scripting,
    TaskServices,
    FileBrowser,
    Profiler,
}

impl FeatureKind {
    /// Attachment order.
    pub const ALL: [FeatureKind; 12] = [
        FeatureKind::Capabilities,
        FeatureKind::Connection,
        FeatureKind::Query,
        FeatureKind::Metadata,
        FeatureKind::AdminServices,
        FeatureKind::Backup,
        FeatureKind::Restore,
        FeatureKind::ObjectExplorer,
        FeatureKind::Scripting,
        FeatureKind::TaskServices,
        FeatureKind::FileBrowser,
        FeatureKind::Profiler,
    ];

    /// Server capability key that gates this feature.
    #[must_use]
    pub fn area(self) -> &'static str {
        match self {
            FeatureKind::Capabilities => "capabilities",
            FeatureKind::Connection => "connection",
            FeatureKind::Query => "query",
            FeatureKind::Metadata => "metadata",
            FeatureKind::AdminServices => "adminServices",
            FeatureKind::Backup => "backup",
            FeatureKind::Restore => "restore",
            FeatureKind::ObjectExplorer => "objectExplorer",
            FeatureKind::Scripting => "scripting",
            FeatureKind::TaskServices => "taskServices",
            FeatureKind::FileBrowser => "fileBrowser",
            FeatureKind::Profiler => "profiler",
        }
    }

    /// Client capability keys this feature contributes. Capability discovery
    /// rides on the connection, so it advertises both.
    #[must_use]
    pub fn capability_areas(self) -> &'static [&'static str] {
        match self {
            FeatureKind::Capabilities => &["connection", "capabilities"],
            FeatureKind::Connection => &["connection"],
            FeatureKind::Query => &["query"],
            FeatureKind::Metadata => &["metadata"],
            FeatureKind::AdminServices => &["adminServices"],
            FeatureKind::Backup => &["backup"],
            FeatureKind::Restore => &["restore"],
            FeatureKind::ObjectExplorer => &["objectExplorer"],
            FeatureKind::Scripting => &["scripting"],
            FeatureKind::TaskServices => &["taskServices"],
            FeatureKind::FileBrowser => &["fileBrowser"],
            FeatureKind::Profiler => &["profiler"],
        }
    }

    #[must_use]
    pub fn message_types(self) -> &'static [MessageType] {
        match self {
            FeatureKind::Capabilities => contracts::capabilities::OWNED,
            FeatureKind::Connection => contracts::connection::OWNED,
            FeatureKind::Query => contracts::query::OWNED,
            FeatureKind::Metadata => contracts::metadata::OWNED,
            FeatureKind::AdminServices => contracts::admin::OWNED,
            FeatureKind::Backup => contracts::backup::OWNED,
            FeatureKind::Restore => contracts::restore::OWNED,
            FeatureKind::ObjectExplorer => contracts::object_explorer::OWNED,
            FeatureKind::Scripting => contracts::scripting::OWNED,
            FeatureKind::TaskServices => contracts::tasks::OWNED,
            FeatureKind::FileBrowser => contracts::file_browser::OWNED,
            FeatureKind::Profiler => contracts::profiler::OWNED,
        }
    }

    #[must_use]
    pub fn owns(self, ty: &MessageType) -> bool {
        self.message_types().contains(ty)
    }

    /// Feature owning `method`, if any.
    #[must_use]
    pub fn owner_of(method: &str) -> Option<FeatureKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.message_types().iter().any(|t| t.method == method))
    }

    fn build_provider(self, conn: ProtocolConnection, provider_id: &str) -> Provider {
        match self {
            FeatureKind::Capabilities => CapabilitiesProvider::new(conn, provider_id).into(),
            FeatureKind::Connection => ConnectionProvider::new(conn, provider_id).into(),
            FeatureKind::Query => QueryProvider::new(conn, provider_id).into(),
            FeatureKind::Metadata => MetadataProvider::new(conn, provider_id).into(),
            FeatureKind::AdminServices => AdminServicesProvider::new(conn, provider_id).into(),
            FeatureKind::Backup => BackupProvider::new(conn, provider_id).into(),
            FeatureKind::Restore => RestoreProvider::new(conn, provider_id).into(),
            FeatureKind::ObjectExplorer => ObjectExplorerProvider::new(conn, provider_id).into(),
            FeatureKind::Scripting => ScriptingProvider::new(conn, provider_id).into(),
            FeatureKind::TaskServices => TaskServicesProvider::new(conn, provider_id).into(),
            FeatureKind::FileBrowser => FileBrowserProvider::new(conn, provider_id).into(),
            FeatureKind::Profiler => ProfilerProvider::new(conn, provider_id).into(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            FeatureKind::Capabilities => "CapabilitiesFeature",
            FeatureKind::Connection => "ConnectionFeature",
            FeatureKind::Query => "QueryFeature",
            FeatureKind::Metadata => "MetadataFeature",
            FeatureKind::AdminServices => "AdminServicesFeature",
            FeatureKind::Backup => "BackupFeature",
            FeatureKind::Restore => "RestoreFeature",
            FeatureKind::ObjectExplorer => "ObjectExplorerFeature",
            FeatureKind::Scripting => "ScriptingFeature",
            FeatureKind::TaskServices => "TaskServicesFeature",
            FeatureKind::FileBrowser => "FileBrowserFeature",
            FeatureKind::Profiler => "ProfilerFeature",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Default)]
struct Registrations {
    entries: HashMap<String, Box<dyn Disposable>>,
    disposed: bool,
}

/// A protocol area attached to the client.
pub struct Feature {
    kind: FeatureKind,
    conn: ProtocolConnection,
    provider_id: String,
    host: Arc<dyn ProviderHost>,
    registrations: Mutex<Registrations>,
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("kind", &self.kind)
            .field("provider_id", &self.provider_id)
            .field("registrations", &self.registration_ids())
            .finish_non_exhaustive()
    }
}

impl Feature {
    #[must_use]
    pub fn new(
        kind: FeatureKind,
        conn: ProtocolConnection,
        provider_id: impl Into<String>,
        host: Arc<dyn ProviderHost>,
    ) -> Self {
        Self {
            kind,
            conn,
            provider_id: provider_id.into(),
            host,
            registrations: Mutex::new(Registrations::default()),
        }
    }

    fn registrations(&self) -> MutexGuard<'_, Registrations> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    #[must_use]
    pub fn message_types(&self) -> &'static [MessageType] {
        self.kind.message_types()
    }

    /// Mark every area this feature contributes as dynamically registrable.
    /// Other keys are left alone.
    pub fn fill_client_capabilities(&self, capabilities: &mut ClientCapabilities) {
        for area in self.kind.capability_areas() {
            capabilities.ensure(area).dynamic_registration = Some(true);
        }
    }

    /// Register this feature's provider under a fresh id.
    ///
    /// # Errors
    ///
    /// Never fails for the feature's own message types; the result mirrors
    /// [`Self::register`].
    pub fn initialize(&self, _server_capabilities: &ServerCapabilities) -> Result<Provider> {
        let id = Uuid::new_v4().to_string();
        self.register(self.message_types(), id)
    }

    /// Build a provider and hand it to the host under `id`. A previous
    /// registration with the same id is disposed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongFeature`] when `messages` is empty or names a
    /// type this feature does not own. Nothing is sent in that case.
    /// Returns [`Error::InvalidState`] once the feature has been disposed.
    pub fn register(&self, messages: &[MessageType], id: String) -> Result<Provider> {
        let Some(first) = messages.first() else {
            return Err(Error::WrongFeature {
                feature: self.kind.name(),
                method: String::new(),
            });
        };
        if let Some(unowned) = messages.iter().find(|ty| !self.kind.owns(ty)) {
            return Err(Error::WrongFeature {
                feature: self.kind.name(),
                method: unowned.method.to_string(),
            });
        }

        // The lock spans the host call so a concurrent dispose either drains
        // this registration or makes it fail.
        let (provider, previous) = {
            let mut registrations = self.registrations();
            if registrations.disposed {
                return Err(Error::InvalidState {
                    expected: "Active",
                    found: "Disposed",
                });
            }
            let provider = self.kind.build_provider(self.conn.clone(), &self.provider_id);
            let disposable = self.host.register_provider(provider.clone());
            let previous = registrations.entries.insert(id.clone(), disposable);
            (provider, previous)
        };
        if let Some(previous) = previous {
            previous.dispose();
        }
        debug!(feature = %self.kind, id = %id, method = first.method, "Registered provider");
        Ok(provider)
    }

    /// Dispose the registration made under `id`. Unknown ids are ignored.
    pub fn unregister(&self, id: &str) {
        let removed = self.registrations().entries.remove(id);
        match removed {
            Some(disposable) => {
                disposable.dispose();
                debug!(feature = %self.kind, id, "Unregistered provider");
            }
            None => debug!(feature = %self.kind, id, "No registration to remove"),
        }
    }

    #[must_use]
    pub fn registration_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registrations().entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Dispose every registration. Later registrations are refused.
    pub fn dispose(&self) {
        let drained: Vec<_> = {
            let mut registrations = self.registrations();
            registrations.disposed = true;
            registrations.entries.drain().collect()
        };
        for (_, disposable) in drained {
            disposable.dispose();
        }
    }
}
