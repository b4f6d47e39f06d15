//! Socket-backed [`MessageChannel`].
//!
//! One reader task owns the inbound half of the stream. Responses are routed
//! to the pending request with the same id, notifications to the handler
//! registered for their method, and server requests to a request handler
//! (answered with `MethodNotFound` when there is none).

use std::collections::HashMap;
#[cfg(unix)]
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitStream;
use futures_util::{Sink, SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::channel::{MessageChannel, NotificationHandler, RequestHandler};
use crate::error::{ChannelError, Result};
use crate::protocol::{Message, Notification, Request, RequestId, Response, RpcError};
use crate::transport::{CodecError, ContentLengthCodec, DEFAULT_MAX_MESSAGE_SIZE};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub request_timeout: Duration,
    pub max_message_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

type PendingRequest = oneshot::Sender<Result<Value>>;
type MessageSink = Pin<Box<dyn Sink<Message, Error = CodecError> + Send>>;

struct Shared {
    sender: Mutex<MessageSink>,
    pending: Mutex<HashMap<RequestId, PendingRequest>>,
    notification_handlers: RwLock<HashMap<String, NotificationHandler>>,
    request_handlers: RwLock<HashMap<String, RequestHandler>>,
    closed: AtomicBool,
    peer_closed: AtomicBool,
}

impl Shared {
    /// `Closed` once the client closed the channel, `ConnectionClosed` once
    /// the server stream ended.
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ChannelError::Closed);
        }
        if self.peer_closed.load(Ordering::Acquire) {
            return Err(ChannelError::ConnectionClosed);
        }
        Ok(())
    }

    async fn send(&self, message: Message) -> Result<()> {
        let mut sender = self.sender.lock().await;
        sender.send(message).await?;
        Ok(())
    }

    async fn complete(&self, response: Response) {
        let tx = self.pending.lock().await.remove(&response.id);
        match tx {
            Some(tx) => {
                let _ = tx.send(response.into_result().map_err(ChannelError::from));
            }
            None => debug!(id = %response.id, "Dropping response for unknown request"),
        }
    }

    fn dispatch_notification(&self, method: &str, params: Option<Value>) {
        let handler = self
            .notification_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(method)
            .cloned();
        match handler {
            Some(handler) => handler(params),
            None => trace!(method, "No subscriber for notification"),
        }
    }

    fn answer(self: &Arc<Self>, id: RequestId, method: String, params: Option<Value>) {
        let handler = self
            .request_handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&method)
            .cloned();
        let shared = Arc::clone(self);

        tokio::spawn(async move {
            let response = match handler {
                Some(handler) => match handler(params).await {
                    Ok(result) => Response::success(id, result),
                    Err(error) => Response::error(id, error),
                },
                None => {
                    debug!(%method, "No handler for server request");
                    Response::error(id, RpcError::method_not_found())
                }
            };
            if let Err(e) = shared.send(Message::Response(response)).await {
                warn!(%method, error = %e, "Failed to answer server request");
            }
        });
    }

    async fn fail_pending(&self, closed_by_client: bool) {
        let mut pending = self.pending.lock().await;
        for (_, tx) in pending.drain() {
            let error = if closed_by_client {
                ChannelError::Closed
            } else {
                ChannelError::ConnectionClosed
            };
            let _ = tx.send(Err(error));
        }
    }
}

/// JSON-RPC channel over any byte stream using `Content-Length` framing.
pub struct RpcChannel {
    shared: Arc<Shared>,
    next_id: AtomicU64,
    config: ChannelConfig,
    reader: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RpcChannel {
    /// Wrap an already-connected stream. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn new<S>(stream: S, config: ChannelConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let framed = Framed::new(
            stream,
            ContentLengthCodec::with_max_message_size(config.max_message_size),
        );
        let (sink, stream) = framed.split();

        let shared = Arc::new(Shared {
            sender: Mutex::new(Box::pin(sink)),
            pending: Mutex::new(HashMap::new()),
            notification_handlers: RwLock::new(HashMap::new()),
            request_handlers: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
            peer_closed: AtomicBool::new(false),
        });

        let reader = tokio::spawn(read_loop(stream, Arc::clone(&shared)));

        Self {
            shared,
            next_id: AtomicU64::new(1),
            config,
            reader: std::sync::Mutex::new(Some(reader)),
        }
    }

    /// Connect to a server listening on a Unix domain socket.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Io` if the socket connection fails.
    #[cfg(unix)]
    pub async fn connect_unix(path: impl AsRef<Path>, config: ChannelConfig) -> Result<Self> {
        let stream = UnixStream::connect(path.as_ref()).await?;
        debug!(path = %path.as_ref().display(), "Connected to server socket");
        Ok(Self::new(stream, config))
    }

    /// Connect to a server listening on TCP.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Io` if the connection fails.
    pub async fn connect_tcp(addr: impl ToSocketAddrs, config: ChannelConfig) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        if let Ok(peer) = stream.peer_addr() {
            debug!(%peer, "Connected to server");
        }
        Ok(Self::new(stream, config))
    }

    #[must_use]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }
}

async fn read_loop<S>(mut stream: SplitStream<Framed<S, ContentLengthCodec>>, shared: Arc<Shared>)
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Response(response)) => shared.complete(response).await,
            Ok(Message::Request(request)) => match request.id {
                Some(id) => shared.answer(id, request.method, request.params),
                None => shared.dispatch_notification(&request.method, request.params),
            },
            Ok(Message::Notification(notification)) => {
                shared.dispatch_notification(&notification.method, notification.params);
            }
            Err(e) => {
                warn!(error = %e, "Failed to decode server message, closing channel");
                break;
            }
        }
    }

    debug!("Server stream ended");
    shared.peer_closed.store(true, Ordering::Release);
    shared.fail_pending(false).await;
}

#[async_trait]
impl MessageChannel for RpcChannel {
    async fn send_request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.shared.ensure_open()?;

        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.shared.pending.lock().await;
            pending.insert(id.clone(), tx);
            // The reader may have drained `pending` just before the insert.
            if let Err(e) = self.shared.ensure_open() {
                pending.remove(&id);
                return Err(e);
            }
        }

        trace!(%id, method, "Sending request");
        let request = Request::new(method, params, id.clone());
        if let Err(e) = self.shared.send(Message::Request(request)).await {
            self.shared.pending.lock().await.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.config.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ChannelError::ConnectionClosed),
            Err(_) => {
                self.shared.pending.lock().await.remove(&id);
                Err(ChannelError::Timeout {
                    method: method.to_string(),
                })
            }
        }
    }

    async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<()> {
        self.shared.ensure_open()?;
        trace!(method, "Sending notification");
        self.shared
            .send(Message::Notification(Notification::new(method, params)))
            .await
    }

    fn on_notification(&self, method: &str, handler: NotificationHandler) {
        let previous = self
            .shared
            .notification_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_string(), handler);
        if previous.is_some() {
            debug!(method, "Replaced notification handler");
        }
    }

    fn on_request(&self, method: &str, handler: RequestHandler) {
        self.shared
            .request_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_string(), handler);
    }

    async fn close(&self) {
        if self.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let reader = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(reader) = reader {
            reader.abort();
        }

        self.shared
            .notification_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.shared
            .request_handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        self.shared.fail_pending(true).await;

        if let Err(e) = self.shared.sender.lock().await.close().await {
            debug!(error = %e, "Error while closing channel");
        }
    }
}

impl Drop for RpcChannel {
    fn drop(&mut self) {
        let reader = self
            .reader
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(reader) = reader {
            reader.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use serde_json::json;
    use tokio::io::DuplexStream;
    use tokio::sync::mpsc;

    type ServerSide = Framed<DuplexStream, ContentLengthCodec>;

    fn pair(config: ChannelConfig) -> (RpcChannel, ServerSide) {
        let (client_io, server_io) = tokio::io::duplex(64 * 1024);
        let channel = RpcChannel::new(client_io, config);
        (channel, Framed::new(server_io, ContentLengthCodec::new()))
    }

    async fn next_request(server: &mut ServerSide) -> Request {
        match server.next().await.unwrap().unwrap() {
            Message::Request(request) => request,
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_resolves_with_result() {
        let (channel, mut server) = pair(ChannelConfig::default());

        let server_task = tokio::spawn(async move {
            let request = next_request(&mut server).await;
            assert_eq!(request.method, "connection/listdatabases");
            assert_eq!(request.params, Some(json!({"ownerUri": "conn://1"})));
            let id = request.id.unwrap();
            server
                .send(Message::Response(Response::success(
                    id,
                    json!({"databaseNames": ["master", "tempdb"]}),
                )))
                .await
                .unwrap();
            server
        });

        let result = channel
            .send_request("connection/listdatabases", Some(json!({"ownerUri": "conn://1"})))
            .await
            .unwrap();
        assert_eq!(result["databaseNames"][1], "tempdb");
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_response_rejects() {
        let (channel, mut server) = pair(ChannelConfig::default());

        tokio::spawn(async move {
            let request = next_request(&mut server).await;
            let error = RpcError::with_data(-32001, "Login failed", json!({"number": 18456}));
            server
                .send(Message::Response(Response::error(request.id.unwrap(), error)))
                .await
                .unwrap();
            server
        });

        let err = channel.send_request("connection/connect", None).await.unwrap_err();
        assert_eq!(err.code(), Some(-32001));
    }

    #[tokio::test]
    async fn test_missing_result_is_null() {
        let (channel, mut server) = pair(ChannelConfig::default());

        tokio::spawn(async move {
            let request = next_request(&mut server).await;
            let response = Response {
                jsonrpc: crate::protocol::JSONRPC_VERSION.to_string(),
                result: None,
                error: None,
                id: request.id.unwrap(),
            };
            server.send(Message::Response(response)).await.unwrap();
            server
        });

        let result = channel.send_request("query/dispose", None).await.unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_notification_reaches_latest_handler() {
        let (channel, mut server) = pair(ChannelConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let stale = tx.clone();
        channel.on_notification(
            "query/complete",
            Arc::new(move |_: Option<Value>| {
                let _ = stale.send("stale");
            }),
        );
        channel.on_notification(
            "query/complete",
            Arc::new(move |params: Option<Value>| {
                assert_eq!(params, Some(json!({"ownerUri": "doc://1"})));
                let _ = tx.send("current");
            }),
        );

        server
            .send(Message::Notification(Notification::new(
                "query/complete",
                Some(json!({"ownerUri": "doc://1"})),
            )))
            .await
            .unwrap();

        assert_eq!(rx.recv().await, Some("current"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_server_request_is_answered() {
        let (channel, mut server) = pair(ChannelConfig::default());
        channel.on_request(
            "client/registerCapability",
            Arc::new(|params: Option<Value>| {
                async move {
                    assert!(params.is_some());
                    Ok::<_, RpcError>(Value::Null)
                }
                .boxed()
            }),
        );

        server
            .send(Message::Request(Request::new(
                "client/registerCapability",
                Some(json!({"registrations": []})),
                RequestId::String("srv-1".to_string()),
            )))
            .await
            .unwrap();

        let Message::Response(response) = server.next().await.unwrap().unwrap() else {
            panic!("expected response");
        };
        assert_eq!(response.id, RequestId::String("srv-1".to_string()));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_server_request_gets_method_not_found() {
        let (_channel, mut server) = pair(ChannelConfig::default());

        server
            .send(Message::Request(Request::new(
                "window/showMessageRequest",
                None,
                7.into(),
            )))
            .await
            .unwrap();

        let Message::Response(response) = server.next().await.unwrap().unwrap() else {
            panic!("expected response");
        };
        assert_eq!(
            response.error.unwrap().code,
            crate::protocol::METHOD_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_eof_fails_pending_requests() {
        let (channel, mut server) = pair(ChannelConfig::default());

        tokio::spawn(async move {
            let _ = next_request(&mut server).await;
            drop(server);
        });

        let err = channel.send_request("capabilities/list", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_requests_after_server_shutdown_fail_fast() {
        let config = ChannelConfig {
            request_timeout: Duration::from_secs(5),
            ..ChannelConfig::default()
        };
        let (channel, server) = pair(config);
        let mut server_io = server.into_inner();
        tokio::io::AsyncWriteExt::shutdown(&mut server_io).await.unwrap();
        while !channel.shared.peer_closed.load(Ordering::Acquire) {
            tokio::task::yield_now().await;
        }

        let started = std::time::Instant::now();
        let err = channel.send_request("metadata/list", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::ConnectionClosed));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(channel.shared.pending.lock().await.is_empty());

        let err = channel.send_notification("initialized", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::ConnectionClosed));
        drop(server_io);
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let config = ChannelConfig {
            request_timeout: Duration::from_millis(50),
            ..ChannelConfig::default()
        };
        let (channel, _server) = pair(config);

        let err = channel.send_request("tasks/listtasks", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::Timeout { ref method } if method == "tasks/listtasks"));
        assert!(channel.shared.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_closed_channel_rejects_calls() {
        let (channel, _server) = pair(ChannelConfig::default());
        channel.close().await;

        let err = channel.send_request("metadata/list", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
        let err = channel.send_notification("initialized", None).await.unwrap_err();
        assert!(matches!(err, ChannelError::Closed));
    }

    #[tokio::test]
    async fn test_notifications_are_sent_without_id() {
        let (channel, mut server) = pair(ChannelConfig::default());
        channel
            .send_notification("initialized", Some(json!({})))
            .await
            .unwrap();

        let message = server.next().await.unwrap().unwrap();
        assert!(message.is_notification());
    }
}
