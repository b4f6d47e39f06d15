//! In-memory [`MessageChannel`] for tests.
//!
//! Canned replies are configured per method and stay in place until replaced.
//! Requests for a method without a reply fail with
//! [`ChannelError::ConnectionClosed`], which is how tests simulate a transport
//! failure. Everything sent through the channel is recorded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::channel::{MessageChannel, NotificationHandler, RequestHandler};
use crate::error::{ChannelError, Result};
use crate::protocol::RpcError;

type Sent = Vec<(String, Option<Value>)>;

#[derive(Default)]
pub struct MockChannel {
    replies: Mutex<HashMap<String, std::result::Result<Value, RpcError>>>,
    requests: Mutex<Sent>,
    notifications: Mutex<Sent>,
    notification_handlers: Mutex<HashMap<String, NotificationHandler>>,
    request_handlers: Mutex<HashMap<String, RequestHandler>>,
    closed: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request for `method` with `result`.
    pub fn respond(&self, method: &str, result: Value) {
        lock(&self.replies).insert(method.to_string(), Ok(result));
    }

    /// Answer every request for `method` with a server error.
    pub fn fail(&self, method: &str, error: RpcError) {
        lock(&self.replies).insert(method.to_string(), Err(error));
    }

    #[must_use]
    pub fn requests(&self) -> Sent {
        lock(&self.requests).clone()
    }

    /// Params of every request sent for `method`, in order.
    #[must_use]
    pub fn requests_for(&self, method: &str) -> Vec<Option<Value>> {
        lock(&self.requests)
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    #[must_use]
    pub fn notifications(&self) -> Sent {
        lock(&self.notifications).clone()
    }

    #[must_use]
    pub fn has_notification_handler(&self, method: &str) -> bool {
        lock(&self.notification_handlers).contains_key(method)
    }

    /// Deliver a server notification. Returns `false` when nobody subscribed.
    pub fn emit(&self, method: &str, params: Value) -> bool {
        let handler = lock(&self.notification_handlers).get(method).cloned();
        match handler {
            Some(handler) => {
                handler(Some(params));
                true
            }
            None => false,
        }
    }

    /// Deliver a server request. `None` when no handler is installed.
    pub async fn server_request(
        &self,
        method: &str,
        params: Value,
    ) -> Option<std::result::Result<Value, RpcError>> {
        let handler = lock(&self.request_handlers).get(method).cloned()?;
        Some(handler(Some(params)).await)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    async fn send_request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        lock(&self.requests).push((method.to_string(), params));
        let reply = lock(&self.replies).get(method).cloned();
        match reply {
            Some(Ok(result)) => Ok(result),
            Some(Err(error)) => Err(error.into()),
            None => Err(ChannelError::ConnectionClosed),
        }
    }

    async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<()> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        lock(&self.notifications).push((method.to_string(), params));
        Ok(())
    }

    fn on_notification(&self, method: &str, handler: NotificationHandler) {
        lock(&self.notification_handlers).insert(method.to_string(), handler);
    }

    fn on_request(&self, method: &str, handler: RequestHandler) {
        lock(&self.request_handlers).insert(method.to_string(), handler);
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        lock(&self.notification_handlers).clear();
        lock(&self.request_handlers).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_canned_reply_and_recording() {
        let mock = MockChannel::new();
        mock.respond("capabilities/list", json!({"capabilities": {}}));

        let result = mock
            .send_request("capabilities/list", Some(json!({"hostName": "t"})))
            .await
            .unwrap();
        assert_eq!(result, json!({"capabilities": {}}));
        assert_eq!(
            mock.requests_for("capabilities/list"),
            vec![Some(json!({"hostName": "t"}))]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_method_fails() {
        let mock = MockChannel::new();
        let err = mock.send_request("metadata/list", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::ConnectionClosed));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_reply() {
        let mock = MockChannel::new();
        mock.fail("query/cancel", RpcError::internal_error("no query"));
        let err = mock.send_request("query/cancel", None).await.unwrap_err();
        assert_eq!(err.code(), Some(crate::protocol::INTERNAL_ERROR));
    }

    #[test]
    fn test_emit_reaches_subscriber() {
        let mock = MockChannel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        mock.on_notification(
            "tasks/statuschanged",
            Arc::new(move |_: Option<Value>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(mock.emit("tasks/statuschanged", json!({})));
        assert!(!mock.emit("tasks/newtaskcreated", json!({})));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_rejects_further_traffic() {
        let mock = MockChannel::new();
        mock.close().await;
        assert!(mock.is_closed());
        assert!(mock.send_notification("initialized", None).await.is_err());
    }
}
