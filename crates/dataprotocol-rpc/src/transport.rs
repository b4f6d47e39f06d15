//! Header-framed transport codec for data protocol messages.
//!
//! Each message is preceded by an HTTP-style header block terminated by an
//! empty line:
//!
//! ```text
//! Content-Length: 52\r\n
//! \r\n
//! {"jsonrpc":"2.0","method":"initialized","params":{}}
//! ```
//!
//! `Content-Length` is mandatory; other headers (`Content-Type`) are
//! accepted and ignored.

use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::protocol::Message;

/// Default upper bound on a single payload (16 MB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &str = "content-length";

/// Headers beyond this size without a terminator are treated as corrupt.
const MAX_HEADER_SIZE: usize = 8 * 1024;

#[derive(Debug)]
pub struct ContentLengthCodec {
    current_length: Option<usize>,
    max_message_size: usize,
}

impl Default for ContentLengthCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLengthCodec {
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_message_size(DEFAULT_MAX_MESSAGE_SIZE)
    }

    #[must_use]
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self {
            current_length: None,
            max_message_size,
        }
    }

    #[must_use]
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    fn parse_headers(&self, raw: &[u8]) -> Result<usize, CodecError> {
        let text = std::str::from_utf8(raw)?;
        let mut length = None;

        for line in text.split("\r\n").filter(|l| !l.is_empty()) {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| CodecError::InvalidHeader(line.to_string()))?;
            if name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
                let parsed = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| CodecError::InvalidHeader(line.to_string()))?;
                length = Some(parsed);
            }
        }

        let length = length.ok_or(CodecError::MissingContentLength)?;
        if length > self.max_message_size {
            return Err(CodecError::MessageTooLarge {
                size: length,
                max: self.max_message_size,
            });
        }
        Ok(length)
    }
}

fn find_terminator(src: &[u8]) -> Option<usize> {
    src.windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

impl Decoder for ContentLengthCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.current_length.is_none() {
            let Some(end) = find_terminator(src) else {
                if src.len() > MAX_HEADER_SIZE {
                    return Err(CodecError::InvalidHeader(
                        "header block not terminated".to_string(),
                    ));
                }
                return Ok(None);
            };

            let headers = src.split_to(end + HEADER_TERMINATOR.len());
            self.current_length = Some(self.parse_headers(&headers[..end])?);
        }

        let Some(length) = self.current_length else {
            return Ok(None);
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let payload = src.split_to(length);
        self.current_length = None;

        let json_str = std::str::from_utf8(&payload)?;
        Ok(Some(serde_json::from_str(json_str)?))
    }
}

impl Encoder<Message> for ContentLengthCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item)?;

        if json.len() > self.max_message_size {
            return Err(CodecError::MessageTooLarge {
                size: json.len(),
                max: self.max_message_size,
            });
        }

        let header = format!("Content-Length: {}\r\n\r\n", json.len());
        dst.reserve(header.len() + json.len());
        dst.put_slice(header.as_bytes());
        dst.put_slice(&json);

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing Content-Length header")]
    MissingContentLength,

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Notification, Request, Response, RpcError};
    use serde_json::json;

    fn framed(body: &str) -> BytesMut {
        BytesMut::from(format!("Content-Length: {}\r\n\r\n{body}", body.len()).as_str())
    }

    #[test]
    fn test_encode_writes_header_then_body() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::new();

        let msg = Message::Notification(Notification::new("initialized", Some(json!({}))));
        codec.encode(msg, &mut buf).unwrap();

        let text = std::str::from_utf8(&buf).unwrap();
        let (header, body) = text.split_once("\r\n\r\n").unwrap();
        assert_eq!(header, format!("Content-Length: {}", body.len()));
        assert!(body.contains("\"initialized\""));
    }

    #[test]
    fn test_decode_request() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::new();
        let request = Request::new(
            "metadata/list",
            Some(json!({"ownerUri": "conn://a"})),
            9.into(),
        );
        codec.encode(Message::Request(request), &mut buf).unwrap();

        match codec.decode(&mut buf).unwrap().unwrap() {
            Message::Request(req) => {
                assert_eq!(req.method, "metadata/list");
                assert_eq!(req.id, Some(9.into()));
            }
            other => panic!("expected request, got {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_error_response() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::new();
        let response = Response::error(1.into(), RpcError::method_not_found());
        codec.encode(Message::Response(response), &mut buf).unwrap();

        let Message::Response(decoded) = codec.decode(&mut buf).unwrap().unwrap() else {
            panic!("expected response");
        };
        assert_eq!(decoded.error.unwrap().code, crate::protocol::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_partial_header_and_body() {
        let mut codec = ContentLengthCodec::new();
        let full = framed(r#"{"jsonrpc":"2.0","result":null,"id":1}"#);

        let mut partial = BytesMut::new();
        partial.extend_from_slice(&full[..10]);
        assert!(codec.decode(&mut partial).unwrap().is_none());

        let header_end = find_terminator(&full).unwrap() + HEADER_TERMINATOR.len();
        partial.extend_from_slice(&full[10..header_end + 5]);
        assert!(codec.decode(&mut partial).unwrap().is_none());

        partial.extend_from_slice(&full[header_end + 5..]);
        assert!(codec.decode(&mut partial).unwrap().is_some());
    }

    #[test]
    fn test_extra_headers_are_ignored() {
        let mut codec = ContentLengthCodec::new();
        let body = r#"{"jsonrpc":"2.0","method":"query/complete","params":{}}"#;
        let mut buf = BytesMut::from(
            format!(
                "Content-Type: application/vscode-jsonrpc; charset=utf-8\r\ncontent-length: {}\r\n\r\n{body}",
                body.len()
            )
            .as_str(),
        );
        let decoded = codec.decode(&mut buf).unwrap().unwrap();
        assert!(decoded.is_notification());
    }

    #[test]
    fn test_back_to_back_messages() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = framed(r#"{"jsonrpc":"2.0","method":"a","params":{}}"#);
        buf.extend_from_slice(&framed(r#"{"jsonrpc":"2.0","method":"b","params":{}}"#));

        let methods: Vec<String> = std::iter::from_fn(|| codec.decode(&mut buf).unwrap())
            .map(|msg| match msg {
                Message::Request(r) => r.method,
                Message::Notification(n) => n.method,
                Message::Response(_) => panic!("unexpected response"),
            })
            .collect();
        assert_eq!(methods, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_content_length() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::from("Content-Type: text/plain\r\n\r\n{}");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::MissingContentLength)
        ));
    }

    #[test]
    fn test_non_numeric_length() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::from("Content-Length: lots\r\n\r\n{}");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_header_without_colon() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::from("garbage\r\n\r\n");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_unterminated_header_overflow() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::from(vec![b'x'; MAX_HEADER_SIZE + 1].as_slice());
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_message_too_large_on_decode() {
        let mut codec = ContentLengthCodec::with_max_message_size(16);
        let mut buf = BytesMut::from("Content-Length: 17\r\n\r\n");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::MessageTooLarge { size: 17, max: 16 })
        ));
    }

    #[test]
    fn test_message_too_large_on_encode() {
        let mut codec = ContentLengthCodec::with_max_message_size(8);
        let mut buf = BytesMut::new();
        let msg = Message::Notification(Notification::new("profiler/eventsavailable", None));
        assert!(matches!(
            codec.encode(msg, &mut buf),
            Err(CodecError::MessageTooLarge { .. })
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_invalid_json_body() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = framed("not valid json");
        assert!(matches!(codec.decode(&mut buf), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_invalid_utf8_body() {
        let mut codec = ContentLengthCodec::new();
        let mut buf = BytesMut::from("Content-Length: 2\r\n\r\n");
        buf.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(codec.decode(&mut buf), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::MessageTooLarge {
            size: 20_000_000,
            max: DEFAULT_MAX_MESSAGE_SIZE,
        };
        assert!(err.to_string().contains("20000000"));
        assert_eq!(
            CodecError::MissingContentLength.to_string(),
            "Missing Content-Length header"
        );
    }
}
