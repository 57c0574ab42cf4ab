//! # Notifier errors

use thiserror::Error;

/// Everything that can go wrong between configuring the processor and
/// routing a unit.
///
/// The first four variants end a single invocation on the failure route.
/// `Configuration` is only raised at startup, before any unit is taken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("code: encoding, description: {0}")]
    Encoding(String),

    #[error("code: validation, description: {0}")]
    Validation(String),

    #[error("code: transport, description: {0}")]
    Transport(String),

    #[error("code: remote_rejection, description: HipChat responded with status {status}")]
    RemoteRejection { status: u16 },

    #[error("code: configuration, description: {0}")]
    Configuration(String),
}

impl NotifierError {
    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &str {
        match self {
            Self::Encoding(_) => "encoding",
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::RemoteRejection { .. } => "remote_rejection",
            Self::Configuration(_) => "configuration",
        }
    }

    /// HTTP status carried by a remote rejection.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteRejection { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        // the request url carries the auth token
        let err = err.without_url();
        let stack = std::iter::successors(
            Some(&err as &(dyn std::error::Error + 'static)),
            |e| e.source(),
        )
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
        Self::Transport(stack)
    }
}
