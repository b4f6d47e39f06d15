//! The message channel seam.
//!
//! Everything above this crate talks to the server through [`MessageChannel`]:
//! requests that resolve to a JSON result, fire-and-forget notifications, and
//! subscriptions for server-initiated traffic. [`crate::RpcChannel`] is the
//! socket implementation; tests substitute in-memory ones.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::Result;
use crate::protocol::RpcError;

/// Callback for a server notification. Receives the raw `params`.
pub type NotificationHandler = Arc<dyn Fn(Option<Value>) + Send + Sync>;

/// Callback answering a server-initiated request.
pub type RequestHandler = Arc<
    dyn Fn(Option<Value>) -> BoxFuture<'static, std::result::Result<Value, RpcError>>
        + Send
        + Sync,
>;

#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Send a request and wait for its result. A response without a
    /// `result` member resolves to `Value::Null`.
    async fn send_request(&self, method: &str, params: Option<Value>) -> Result<Value>;

    async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<()>;

    /// Subscribe to a notification method. A later subscription for the
    /// same method replaces the earlier one.
    fn on_notification(&self, method: &str, handler: NotificationHandler);

    /// Answer server requests for `method`. Replaces any earlier handler.
    fn on_request(&self, method: &str, handler: RequestHandler);

    /// Stop delivering traffic and fail outstanding requests.
    async fn close(&self);
}
