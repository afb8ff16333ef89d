use thiserror::Error;

/// Failure taxonomy for the progress core.
///
/// Session expiry is handled at the client boundary (see `api::client`);
/// everything else propagates to the immediate caller. Nothing here is
/// retried automatically.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote session check failed for a reason other than
    /// "not logged in".
    #[error("auth check failed: {0}")]
    Auth(String),

    /// A 401 arrived mid-session. The expiry hook has already fired.
    #[error("session expired")]
    SessionExpired,

    /// Non-2xx response (other than 401) or a network-level failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// Malformed local input, rejected before any network call.
    #[error("invalid input: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
