//! Feature registration and provider surface for data protocol servers.
//!
//! A [`DataProtocolClient`] sits on top of a [`dataprotocol_rpc::MessageChannel`].
//! It attaches one [`Feature`] per protocol area, folds their client
//! capabilities into the `initialize` handshake, and on success registers a
//! [`Provider`] per feature with the host's [`ProviderHost`]. Hosts then call
//! typed provider methods; failures are logged once and either defaulted or
//! returned, depending on the operation.

pub mod client;
pub mod config;
pub mod connection;
pub mod contracts;
pub mod convert;
pub mod feature;
pub mod features;
pub mod handshake;
pub mod host;

mod error;

pub use client::{ClientState, DataProtocolClient};
pub use config::ClientConfig;
pub use connection::{FailureHook, ProtocolConnection};
pub use contracts::{ALL_MESSAGE_TYPES, MessageKind, MessageType};
pub use convert::to_wire::EditTarget;
pub use error::{Error, Result};
pub use feature::{Feature, FeatureKind};
pub use features::{
    AdminServicesProvider, BackupProvider, CapabilitiesProvider, ConnectionProvider,
    FileBrowserProvider, MetadataProvider, ObjectExplorerProvider, ProfilerProvider,
    QueryProvider, RestoreProvider, ScriptingProvider, TaskServicesProvider,
};
pub use handshake::{ClientCapabilities, ServerCapabilities};
pub use host::{Disposable, FromProvider, Provider, ProviderHost, ProviderRegistry};
