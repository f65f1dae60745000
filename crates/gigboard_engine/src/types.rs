use std::fmt;

use gigboard_core::{JobRecord, User};

/// Access and refresh tokens for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Identity provider operations the engine runs on behalf of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOp {
    SignIn,
    SignUp,
    PasswordReset,
    PasswordUpdate,
    SignOut,
}

/// One page read from the remote table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<JobRecord>,
    /// Rows that could not be coerced into a job record.
    pub rejected: usize,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The signed-in identity changed (login, logout, session restore).
    IdentityChanged(Option<User>),
    AuthCompleted {
        op: AuthOp,
        result: Result<(), AuthError>,
    },
    PageFetched {
        epoch: u64,
        page_index: u32,
        result: Result<Page, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// A failed identity provider call. `message` is meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub kind: AuthFailureKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureKind {
    /// The provider rejected the request (bad credentials, weak password, ...).
    Rejected,
    /// The operation needs a signed-in session and there is none.
    NotSignedIn,
    Network,
    Decode,
}

impl From<FetchError> for AuthError {
    fn from(err: FetchError) -> Self {
        let kind = match err.kind {
            FailureKind::HttpStatus(_) => AuthFailureKind::Rejected,
            FailureKind::Decode => AuthFailureKind::Decode,
            FailureKind::InvalidUrl | FailureKind::Timeout | FailureKind::Network => {
                AuthFailureKind::Network
            }
        };
        AuthError::new(kind, err.message)
    }
}
