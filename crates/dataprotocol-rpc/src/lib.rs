//! JSON-RPC 2.0 plumbing for talking to a data protocol server.
//!
//! - [`protocol`]: request, response and notification envelopes
//! - [`transport`]: `Content-Length` header framing codec
//! - [`channel`]: the [`MessageChannel`] trait the client layer is written against
//! - [`client`]: [`RpcChannel`], the socket implementation of that trait
//! - [`error`]: [`ChannelError`] and the `Result` alias
//! - [`mock`]: [`MockChannel`], an in-memory channel for tests
//!
//! # Example
//!
//! ```no_run
//! use dataprotocol_rpc::{ChannelConfig, MessageChannel, RpcChannel};
//!
//! # async fn example() -> dataprotocol_rpc::Result<()> {
//! let channel = RpcChannel::connect_tcp("127.0.0.1:4444", ChannelConfig::default()).await?;
//! let caps = channel.send_request("capabilities/list", None).await?;
//! println!("{caps}");
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod client;
pub mod error;
pub mod mock;
pub mod protocol;
pub mod transport;

pub use channel::{MessageChannel, NotificationHandler, RequestHandler};
pub use client::{ChannelConfig, DEFAULT_REQUEST_TIMEOUT, RpcChannel};
pub use error::{ChannelError, Result};
pub use mock::MockChannel;
pub use protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, Message,
    Notification, PARSE_ERROR, REQUEST_CANCELLED, Request, RequestId, Response, RpcError,
    SERVER_NOT_INITIALIZED, UNKNOWN_ERROR_CODE,
};
pub use transport::{CodecError, ContentLengthCodec, DEFAULT_MAX_MESSAGE_SIZE};
