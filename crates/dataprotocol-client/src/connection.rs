//! Typed access to the shared message channel.
//!
//! Every provider call goes through one of the helpers here, which fixes how
//! failures are treated:
//!
//! - [`ProtocolConnection::request_or_default`] / [`ProtocolConnection::request_optional`]:
//!   log the failure and resolve with a safe default
//! - [`ProtocolConnection::request_or_propagate`]: log the failure and hand
//!   the original error back
//! - [`ProtocolConnection::notify`]: log and drop
//!
//! Logging always goes through [`ProtocolConnection::log_failed_request`], so
//! each failed call is reported exactly once.

use std::fmt;
use std::sync::Arc;

use dataprotocol_rpc::MessageChannel;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, trace, warn};

use crate::Result;
use crate::contracts::{MessageType, NotificationType, RequestType};
use crate::error::Error;

/// Observer invoked after every logged request failure.
pub type FailureHook = Arc<dyn Fn(MessageType, &Error) + Send + Sync>;

#[derive(Clone)]
pub struct ProtocolConnection {
    channel: Arc<dyn MessageChannel>,
    failure_hook: Option<FailureHook>,
}

impl fmt::Debug for ProtocolConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolConnection")
            .field("failure_hook", &self.failure_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl ProtocolConnection {
    #[must_use]
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self {
            channel,
            failure_hook: None,
        }
    }

    #[must_use]
    pub fn with_failure_hook(mut self, hook: FailureHook) -> Self {
        self.failure_hook = Some(hook);
        self
    }

    #[must_use]
    pub fn channel(&self) -> &Arc<dyn MessageChannel> {
        &self.channel
    }

    /// Send a typed request without any failure handling.
    ///
    /// # Errors
    ///
    /// Returns the channel error, or a JSON error if params or result do not
    /// match the declared shapes.
    pub async fn send_request<P, R>(&self, ty: RequestType<P, R>, params: &P) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let result = self.channel.send_request(ty.method, Some(params)).await?;
        trace!(method = ty.method, "Request completed");
        Ok(serde_json::from_value(result)?)
    }

    /// The single place request failures are reported.
    pub fn log_failed_request(&self, ty: MessageType, err: &Error) {
        error!(method = ty.method, error = %err, "Request failed");
        if let Some(hook) = &self.failure_hook {
            hook(ty, err);
        }
    }

    /// Send a request; on failure log it and return the original error.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Self::send_request`] returned.
    pub async fn request_or_propagate<P, R>(&self, ty: RequestType<P, R>, params: &P) -> Result<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.send_request(ty, params)
            .await
            .inspect_err(|e| self.log_failed_request(ty.message_type(), e))
    }

    /// Send a request; on failure log it and resolve with `R::default()`
    /// (`false`, an empty list, ...).
    pub async fn request_or_default<P, R>(&self, ty: RequestType<P, R>, params: &P) -> R
    where
        P: Serialize + Sync,
        R: DeserializeOwned + Default,
    {
        self.request_or_propagate(ty, params)
            .await
            .unwrap_or_default()
    }

    /// Send a request; on failure log it and resolve with `None`.
    pub async fn request_optional<P, R>(&self, ty: RequestType<P, R>, params: &P) -> Option<R>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        self.request_or_propagate(ty, params).await.ok()
    }

    /// Fire-and-forget notification. Failures are logged and dropped.
    pub async fn notify<P>(&self, ty: NotificationType<P>, params: &P)
    where
        P: Serialize + Sync,
    {
        let sent = match serde_json::to_value(params) {
            Ok(params) => self
                .channel
                .send_notification(ty.method, Some(params))
                .await
                .map_err(Error::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = sent {
            self.log_failed_request(ty.message_type(), &e);
        }
    }

    /// Subscribe to a typed notification. Replaces any earlier subscriber for
    /// the same method. Payloads that do not decode are logged and dropped.
    pub fn on_notification<P, F>(&self, ty: NotificationType<P>, handler: F)
    where
        P: DeserializeOwned + 'static,
        F: Fn(P) + Send + Sync + 'static,
    {
        let method = ty.method;
        self.channel.on_notification(
            method,
            Arc::new(move |params: Option<Value>| {
                match serde_json::from_value::<P>(params.unwrap_or(Value::Null)) {
                    Ok(payload) => handler(payload),
                    Err(e) => warn!(method, error = %e, "Dropping malformed notification"),
                }
            }),
        );
    }
}
