use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Resolution and traversal
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("undecodable name {name:?} in {dir}")]
    InvalidName { dir: String, name: String },

    // Plugin lifecycle
    #[error("provider is not active")]
    Inactive,

    // Streams
    #[error("stream is not seekable")]
    NotSeekable,

    #[error("invalid seek offset {0}")]
    InvalidSeek(i64),

    #[error("stream is closed")]
    StreamClosed,

    #[error("IO error at {address}")]
    Io {
        address: String,
        #[source]
        source: io::Error,
    },

    // Third-party providers
    #[error("provider error: {0}")]
    Provider(String),
}

impl BridgeError {
    /// Classify an `io::Error` raised while touching `address`.
    pub fn io(address: impl Into<String>, err: io::Error) -> Self {
        let address = address.into();
        match err.kind() {
            io::ErrorKind::NotFound         => Self::NotFound(address),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(address),
            _                               => Self::Io { address, source: err },
        }
    }

    /// The address this error occurred at, if applicable.
    /// Callers use this to present "Skipped: <address>" without matching on variants.
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::NotFound(a)
            | Self::PermissionDenied(a)
            | Self::InvalidAddress(a)
            | Self::UnsupportedScheme(a)
            | Self::InvalidName { dir: a, .. }
            | Self::Io { address: a, .. } => Some(a),
            _ => None,
        }
    }

    /// Whether a directory walk can continue past this error.
    ///
    /// Recoverable errors describe one branch of the tree (missing entry,
    /// permission denied, IO). Everything else concerns the plugin or the
    /// stream as a whole.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::PermissionDenied(_)
                | Self::InvalidName { .. }
                | Self::Io { .. }
                | Self::Provider(_)
        )
    }
}
