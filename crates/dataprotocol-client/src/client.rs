//! The client: owns the features, runs the handshake and answers the
//! server's dynamic registration requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use dataprotocol_rpc::{MessageChannel, RpcError};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::ClientConfig;
use crate::connection::{FailureHook, ProtocolConnection};
use crate::contracts::{MessageType, lifecycle};
use crate::error::Error;
use crate::feature::{Feature, FeatureKind};
use crate::handshake::{
    ClientCapabilities, ClientInfo, InitializeParams, InitializedParams, RegistrationParams,
    ServerCapabilities, UnregistrationParams,
};
use crate::host::ProviderHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Constructed,
    Negotiating,
    Active,
    Disposed,
}

impl ClientState {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ClientState::Constructed => "Constructed",
            ClientState::Negotiating => "Negotiating",
            ClientState::Active => "Active",
            ClientState::Disposed => "Disposed",
        }
    }
}

struct Inner {
    config: ClientConfig,
    conn: ProtocolConnection,
    features: Vec<Feature>,
    state: Mutex<ClientState>,
    server_capabilities: Mutex<Option<ServerCapabilities>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    fn state(&self) -> ClientState {
        *lock(&self.state)
    }

    /// Move `from -> to`, failing if the client is elsewhere.
    fn transition(&self, from: ClientState, to: ClientState) -> Result<()> {
        let mut state = lock(&self.state);
        if *state != from {
            return Err(Error::InvalidState {
                expected: from.name(),
                found: state.name(),
            });
        }
        debug!(from = from.name(), to = to.name(), "Client state change");
        *state = to;
        Ok(())
    }

    fn feature(&self, kind: FeatureKind) -> Option<&Feature> {
        self.features.iter().find(|f| f.kind() == kind)
    }

    fn register_capability(&self, params: &RegistrationParams) -> Result<()> {
        let state = self.state();
        if !matches!(state, ClientState::Negotiating | ClientState::Active) {
            return Err(Error::InvalidState {
                expected: ClientState::Active.name(),
                found: state.name(),
            });
        }

        let mut routed = Vec::with_capacity(params.registrations.len());
        for registration in &params.registrations {
            let ty = MessageType::from_method(&registration.method)
                .ok_or_else(|| Error::UnknownMethod(registration.method.clone()))?;
            let feature = FeatureKind::owner_of(ty.method)
                .and_then(|kind| self.feature(kind))
                .ok_or_else(|| Error::UnknownMethod(registration.method.clone()))?;
            routed.push((feature, ty, registration.id.clone()));
        }

        for (feature, ty, id) in routed {
            feature.register(&[ty], id)?;
        }
        Ok(())
    }

    fn unregister_capability(&self, params: &UnregistrationParams) {
        for unregistration in &params.unregistrations {
            debug!(
                id = %unregistration.id,
                method = %unregistration.method,
                "Server unregistration"
            );
            for feature in &self.features {
                feature.unregister(&unregistration.id);
            }
        }
    }
}

fn decode<P: DeserializeOwned>(params: Option<Value>) -> std::result::Result<P, RpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| RpcError::invalid_params(e.to_string()))
}

/// Entry point for hosts.
///
/// Construction attaches every feature and subscribes to the server's
/// registration requests; [`DataProtocolClient::start`] performs the
/// handshake and registers one provider per feature with the host.
#[derive(Clone)]
pub struct DataProtocolClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DataProtocolClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProtocolClient")
            .field("state", &self.state())
            .field("provider_id", &self.inner.config.provider_id)
            .finish_non_exhaustive()
    }
}

impl DataProtocolClient {
    #[must_use]
    pub fn new(
        channel: Arc<dyn MessageChannel>,
        host: Arc<dyn ProviderHost>,
        config: ClientConfig,
    ) -> Self {
        Self::build(ProtocolConnection::new(channel), host, config)
    }

    /// Like [`Self::new`], additionally calling `hook` after every logged
    /// request failure.
    #[must_use]
    pub fn with_failure_hook(
        channel: Arc<dyn MessageChannel>,
        host: Arc<dyn ProviderHost>,
        config: ClientConfig,
        hook: FailureHook,
    ) -> Self {
        Self::build(
            ProtocolConnection::new(channel).with_failure_hook(hook),
            host,
            config,
        )
    }

    fn build(conn: ProtocolConnection, host: Arc<dyn ProviderHost>, config: ClientConfig) -> Self {
        let features = FeatureKind::ALL
            .into_iter()
            .map(|kind| {
                Feature::new(
                    kind,
                    conn.clone(),
                    config.provider_id.clone(),
                    Arc::clone(&host),
                )
            })
            .collect();

        let client = Self {
            inner: Arc::new(Inner {
                config,
                conn,
                features,
                state: Mutex::new(ClientState::Constructed),
                server_capabilities: Mutex::new(None),
            }),
        };
        client.install_request_handlers();
        client
    }

    fn install_request_handlers(&self) {
        let channel = self.inner.conn.channel();

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        channel.on_request(
            lifecycle::REGISTER_CAPABILITY.method,
            Arc::new(move |params: Option<Value>| -> BoxFuture<'static, std::result::Result<Value, RpcError>> {
                let weak = weak.clone();
                async move {
                    let inner = weak
                        .upgrade()
                        .ok_or_else(|| RpcError::internal_error("client disposed"))?;
                    let params: RegistrationParams = decode(params)?;
                    inner
                        .register_capability(&params)
                        .map_err(|e| RpcError::invalid_params(e.to_string()))?;
                    Ok(Value::Null)
                }
                .boxed()
            }),
        );

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        channel.on_request(
            lifecycle::UNREGISTER_CAPABILITY.method,
            Arc::new(move |params: Option<Value>| -> BoxFuture<'static, std::result::Result<Value, RpcError>> {
                let weak = weak.clone();
                async move {
                    let inner = weak
                        .upgrade()
                        .ok_or_else(|| RpcError::internal_error("client disposed"))?;
                    let params: UnregistrationParams = decode(params)?;
                    inner.unregister_capability(&params);
                    Ok(Value::Null)
                }
                .boxed()
            }),
        );
    }

    #[must_use]
    pub fn state(&self) -> ClientState {
        self.inner.state()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn connection(&self) -> &ProtocolConnection {
        &self.inner.conn
    }

    /// Features in attachment order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.inner.features
    }

    #[must_use]
    pub fn feature(&self, kind: FeatureKind) -> Option<&Feature> {
        self.inner.feature(kind)
    }

    /// Server capabilities from the last successful handshake.
    #[must_use]
    pub fn server_capabilities(&self) -> Option<ServerCapabilities> {
        lock(&self.inner.server_capabilities).clone()
    }

    /// The capability document sent in `initialize`, folded from every
    /// feature.
    #[must_use]
    pub fn client_capabilities(&self) -> ClientCapabilities {
        let mut capabilities = ClientCapabilities::new();
        for feature in &self.inner.features {
            feature.fill_client_capabilities(&mut capabilities);
        }
        capabilities
    }

    pub fn log_failed_request(&self, ty: MessageType, err: &Error) {
        self.inner.conn.log_failed_request(ty, err);
    }

    /// Run the handshake: `initialize`, feature initialization in attachment
    /// order, then `initialized`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] unless the client is freshly
    /// constructed, or the logged `initialize` failure, after which the
    /// client is back in [`ClientState::Constructed`] and may retry.
    pub async fn start(&self) -> Result<ServerCapabilities> {
        self.inner
            .transition(ClientState::Constructed, ClientState::Negotiating)?;

        let config = &self.inner.config;
        let params = InitializeParams {
            process_id: Some(std::process::id()),
            client_info: Some(ClientInfo {
                name: config.host_name.clone(),
                version: Some(config.host_version.clone()),
            }),
            root_uri: None,
            capabilities: self.client_capabilities(),
            initialization_options: config.initialization_options.clone(),
        };

        let result = match self
            .inner
            .conn
            .request_or_propagate(lifecycle::INITIALIZE, &params)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                // A dispose racing the handshake wins.
                let _ = self
                    .inner
                    .transition(ClientState::Negotiating, ClientState::Constructed);
                return Err(err);
            }
        };

        let state = self.inner.state();
        if state != ClientState::Negotiating {
            return Err(Error::InvalidState {
                expected: ClientState::Negotiating.name(),
                found: state.name(),
            });
        }

        let capabilities = result.capabilities;
        *lock(&self.inner.server_capabilities) = Some(capabilities.clone());
        self.initialize_features(&capabilities)?;

        self.inner
            .conn
            .notify(lifecycle::INITIALIZED, &InitializedParams {})
            .await;
        self.inner
            .transition(ClientState::Negotiating, ClientState::Active)?;

        info!(
            provider_id = %config.provider_id,
            areas = capabilities.as_map().len(),
            "Client started"
        );
        Ok(capabilities)
    }

    /// Stops at the first feature refusing because the client was disposed.
    fn initialize_features(&self, capabilities: &ServerCapabilities) -> Result<()> {
        let gated = self.inner.config.require_server_capabilities;
        for feature in &self.inner.features {
            let area = feature.kind().area();
            if gated && !capabilities.has_area(area) {
                warn!(feature = %feature.kind(), area, "Server lacks capability, skipping feature");
                continue;
            }
            match feature.initialize(capabilities) {
                Ok(_) => {}
                Err(e @ Error::InvalidState { .. }) => return Err(e),
                Err(e) => {
                    warn!(feature = %feature.kind(), error = %e, "Feature initialization failed");
                }
            }
        }
        Ok(())
    }

    /// Route a server `client/registerCapability` request to the owning
    /// features. Either every registration is accepted or none is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMethod`] if no feature owns a method, or
    /// [`Error::InvalidState`] outside negotiation and active use.
    pub fn register_capability(&self, params: &RegistrationParams) -> Result<()> {
        self.inner.register_capability(params)
    }

    /// Route a server `client/unregisterCapability` request. Unknown ids are
    /// ignored.
    pub fn unregister_capability(&self, params: &UnregistrationParams) {
        self.inner.unregister_capability(params);
    }

    /// Dispose every feature in reverse attachment order and close the
    /// channel. Calling this more than once is harmless.
    pub async fn dispose(&self) {
        let previous = std::mem::replace(&mut *lock(&self.inner.state), ClientState::Disposed);
        if previous == ClientState::Disposed {
            return;
        }
        for feature in self.inner.features.iter().rev() {
            feature.dispose();
        }
        self.inner.conn.channel().close().await;
        info!(from = previous.name(), "Client disposed");
    }
}
