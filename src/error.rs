use thiserror::Error;

/// Authentication errors from login or registration.
///
/// Carries the server-provided message where one exists so the UI can
/// surface it verbatim.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("credentials rejected: {0}")]
    Rejected(String),

    #[error("login succeeded but no token was returned")]
    MissingToken,
}

/// A failed remote call: any non-2xx response or transport failure.
///
/// `status` is the HTTP status code; 0 means the request never produced a
/// response (connection failure or timeout).
#[derive(Error, Debug, Clone)]
#[error("remote error (status {status}): {message}")]
pub struct RemoteError {
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A transport-level failure that never reached the server.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    /// A request that exceeded the configured timeout.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(0, "timeout")
    }
}

/// Local credential persistence errors.
///
/// These are logged and swallowed at the session boundary: losing
/// persistence only means the session does not survive a restart.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to read session file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write session file: {0}")]
    Write(#[source] std::io::Error),

    #[error("persisted session is corrupt: {0}")]
    Corrupt(String),
}

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A mutation was attempted without an active session.
    #[error("authentication required")]
    AuthRequired,

    /// A toggle for the same id is still pending; callers retry after it
    /// settles.
    #[error("a mutation for '{id}' is already in flight")]
    ToggleInFlight { id: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Remote(RemoteError::timeout())
        } else {
            Error::Remote(RemoteError::transport(err.to_string()))
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl Error {
    /// True when the error should be rendered as a blocking notice
    /// (auth failures and failed writes) rather than inline text.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Error::Auth(_) | Error::AuthRequired | Error::ToggleInFlight { .. }
        )
    }
}
