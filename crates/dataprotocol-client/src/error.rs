use dataprotocol_rpc::ChannelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Register called on wrong feature: {feature} does not own {method}")]
    WrongFeature { feature: &'static str, method: String },

    #[error("Unsupported save format: {0}")]
    UnsupportedSaveFormat(String),

    #[error("Invalid client state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    #[error("No feature owns method: {0}")]
    UnknownMethod(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that came back from the server or the transport,
    /// as opposed to ones detected before anything was sent.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Channel(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
