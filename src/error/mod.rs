pub(crate) mod internal;

use std::fmt;
use std::io;

/// Error surface exposed to library consumers.
///
/// Variants follow the failure taxonomy of the club service boundary:
/// transport, authentication, authorization and content lookup failures
/// are kept distinct so callers can decide between retrying, prompting
/// for login and rendering an in-place denial.
#[derive(Debug)]
pub enum ClubError {
    /// The club service could not be reached.
    Transport { message: String },
    /// Credentials were rejected, or the operation requires a session.
    Unauthenticated { message: String },
    /// The session is valid but its role does not allow the operation.
    PermissionDenied,
    /// The requested content does not exist.
    NotFound,
    /// The service reported a failure outside the taxonomy above.
    Api { message: String },
    Io(io::Error),
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for ClubError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClubError::Transport { message } => write!(f, "transport: {}", message),
            ClubError::Unauthenticated { message } => write!(f, "unauthenticated: {}", message),
            ClubError::PermissionDenied => write!(f, "permission denied"),
            ClubError::NotFound => write!(f, "not found"),
            ClubError::Api { message } => write!(f, "api: {}", message),
            ClubError::Io(err) => err.fmt(f),
            ClubError::Internal(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ClubError {}

impl From<io::Error> for ClubError {
    fn from(err: io::Error) -> Self {
        ClubError::Io(err)
    }
}

impl From<reqwest::Error> for ClubError {
    fn from(err: reqwest::Error) -> Self {
        ClubError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<internal::Error> for ClubError {
    fn from(err: internal::Error) -> Self {
        ClubError::Internal(Box::new(err))
    }
}
