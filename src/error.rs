//! Error types for MudraCast

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// MudraCast error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Start called on a running server
    #[error("Server already started")]
    AlreadyStarted,

    /// Operation requires a started server
    #[error("Server not started")]
    NotStarted,

    /// Start called on a stopped server (construct a fresh instance instead)
    #[error("Server stopped; a stopped server cannot be restarted")]
    Stopped,

    /// Resource acquisition failed during server start
    #[error("Server start failed at {step}: {source}")]
    ServerStart {
        /// Failing setup step (create, bind, non-blocking)
        step: &'static str,
        /// Underlying OS error
        source: std::io::Error,
    },

    /// OSC address pattern failed validation
    #[error("Invalid OSC address: {0:?}")]
    InvalidAddress(String),

    /// Datagram resolve or send failure
    #[error("Send failed: {0}")]
    Send(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
