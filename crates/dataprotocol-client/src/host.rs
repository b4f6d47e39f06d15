//! The seam between features and the host application.
//!
//! A feature builds a [`Provider`] and hands it to the host through
//! [`ProviderHost::register_provider`]. The returned [`Disposable`] undoes
//! that registration. [`ProviderRegistry`] is an in-memory host suitable for
//! command line tools and tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::debug;

use crate::feature::FeatureKind;
use crate::features::{
    AdminServicesProvider, BackupProvider, CapabilitiesProvider, ConnectionProvider,
    FileBrowserProvider, MetadataProvider, ObjectExplorerProvider, ProfilerProvider,
    QueryProvider, RestoreProvider, ScriptingProvider, TaskServicesProvider,
};

/// Handle that undoes one registration.
pub trait Disposable: Send {
    fn dispose(self: Box<Self>);
}

/// Receives providers built by features.
pub trait ProviderHost: Send + Sync {
    fn register_provider(&self, provider: Provider) -> Box<dyn Disposable>;
}

/// A registered provider, one variant per feature area.
#[derive(Debug, Clone)]
pub enum Provider {
    Capabilities(CapabilitiesProvider),
    Connection(ConnectionProvider),
    Query(QueryProvider),
    Metadata(MetadataProvider),
    AdminServices(AdminServicesProvider),
    Backup(BackupProvider),
    Restore(RestoreProvider),
    ObjectExplorer(ObjectExplorerProvider),
    Scripting(ScriptingProvider),
    TaskServices(TaskServicesProvider),
    FileBrowser(FileBrowserProvider),
    Profiler(ProfilerProvider),
}

/// Typed view of a [`Provider`] variant.
pub trait FromProvider: Sized {
    fn from_provider(provider: &Provider) -> Option<Self>;
}

macro_rules! provider_variants {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        impl Provider {
            #[must_use]
            pub fn kind(&self) -> FeatureKind {
                match self {
                    $(Provider::$variant(_) => FeatureKind::$variant,)+
                }
            }

            #[must_use]
            pub fn provider_id(&self) -> &str {
                match self {
                    $(Provider::$variant(p) => p.provider_id(),)+
                }
            }
        }

        $(
            impl FromProvider for $ty {
                fn from_provider(provider: &Provider) -> Option<Self> {
                    match provider {
                        Provider::$variant(p) => Some(p.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Provider {
                fn from(provider: $ty) -> Self {
                    Provider::$variant(provider)
                }
            }
        )+
    };
}

provider_variants! {
    Capabilities => CapabilitiesProvider,
    Connection => ConnectionProvider,
    Query => QueryProvider,
    Metadata => MetadataProvider,
    AdminServices => AdminServicesProvider,
    Backup => BackupProvider,
    Restore => RestoreProvider,
    ObjectExplorer => ObjectExplorerProvider,
    Scripting => ScriptingProvider,
    TaskServices => TaskServicesProvider,
    FileBrowser => FileBrowserProvider,
    Profiler => ProfilerProvider,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: Vec<(u64, Provider)>,
}

fn lock(inner: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory [`ProviderHost`]. Later registrations shadow earlier ones of
/// the same kind until disposed.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently registered provider of `kind`.
    #[must_use]
    pub fn provider(&self, kind: FeatureKind) -> Option<Provider> {
        lock(&self.inner)
            .entries
            .iter()
            .rev()
            .find(|(_, p)| p.kind() == kind)
            .map(|(_, p)| p.clone())
    }

    /// Most recently registered provider of type `T`.
    #[must_use]
    pub fn get<T: FromProvider>(&self) -> Option<T> {
        lock(&self.inner)
            .entries
            .iter()
            .rev()
            .find_map(|(_, p)| T::from_provider(p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.inner).entries.is_empty()
    }
}

impl ProviderHost for ProviderRegistry {
    fn register_provider(&self, provider: Provider) -> Box<dyn Disposable> {
        let mut inner = lock(&self.inner);
        inner.next_id += 1;
        let id = inner.next_id;
        debug!(kind = %provider.kind(), provider_id = provider.provider_id(), id, "Provider registered");
        inner.entries.push((id, provider));
        Box::new(RegistryHandle {
            registry: Arc::downgrade(&self.inner),
            id,
        })
    }
}

struct RegistryHandle {
    registry: Weak<Mutex<RegistryInner>>,
    id: u64,
}

impl Disposable for RegistryHandle {
    fn dispose(self: Box<Self>) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).entries.retain(|(id, _)| *id != self.id);
            debug!(id = self.id, "Provider unregistered");
        }
    }
}
