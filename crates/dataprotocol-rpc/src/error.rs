//! Error type for channel operations.

use serde_json::Value;

use crate::protocol::RpcError;
use crate::transport::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i32,
        message: String,
        data: Option<Value>,
    },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Request timed out: {method}")]
    Timeout { method: String },

    #[error("Channel closed by client")]
    Closed,
}

impl ChannelError {
    pub fn rpc(code: i32, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Server-reported error code, if this failure came from the server.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<RpcError> for ChannelError {
    fn from(e: RpcError) -> Self {
        Self::Rpc {
            code: e.code,
            message: e.message,
            data: e.data,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChannelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_rpc_error_keeps_data() {
        let err: ChannelError =
            RpcError::with_data(-32001, "Login failed", json!({"number": 18456})).into();
        match err {
            ChannelError::Rpc {
                code,
                message,
                data,
            } => {
                assert_eq!(code, -32001);
                assert_eq!(message, "Login failed");
                assert_eq!(data, Some(json!({"number": 18456})));
            }
            other => panic!("expected Rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_code_only_for_server_errors() {
        assert_eq!(ChannelError::rpc(-32603, "boom").code(), Some(-32603));
        assert_eq!(ChannelError::ConnectionClosed.code(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelError::ConnectionClosed.to_string(), "Connection closed");
        let err = ChannelError::Timeout {
            method: "query/executeDocumentSelection".to_string(),
        };
        assert!(err.to_string().contains("query/executeDocumentSelection"));
        let err: ChannelError = CodecError::MissingContentLength.into();
        assert!(err.to_string().starts_with("Codec error"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ChannelError = io_err.into();
        assert!(matches!(err, ChannelError::Io(_)));
    }
}
