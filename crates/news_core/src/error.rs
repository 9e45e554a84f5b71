use std::fmt;

/// Failure of a single HTTP fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request URL could not be parsed; no connection was attempted.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// DNS, connect, timeout or body-read failure.
    #[error("{kind} failure: {message}")]
    Transport { kind: TransportKind, message: String },
    /// The server answered with anything other than 200.
    #[error("http status {0}")]
    HttpStatus(u16),
}

impl FetchError {
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        FetchError::Transport {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Body,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Timeout => write!(f, "timeout"),
            TransportKind::Connect => write!(f, "connect"),
            TransportKind::Body => write!(f, "body"),
            TransportKind::Other => write!(f, "network"),
        }
    }
}

/// Why a load cycle ended in the failed state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("no network connectivity")]
    NoConnectivity,
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}
