use thiserror::Error;

/// An error reported by the hosted API, or encountered while talking to it.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum GithubError {
    /// The credential token was rejected.
    #[error("bad credentials: {message}")]
    Unauthorized { message: String },

    /// The requested resource does not exist, or is not visible to the
    /// authenticated user.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other unsuccessful response.
    #[error("GitHub API responded with status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request could not be sent, or the response could not be read.
    #[error("could not reach GitHub: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not in the expected format.
    #[error("could not decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GithubError {
    /// Classify an unsuccessful response by its status code.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => GithubError::Unauthorized { message },
            404 => GithubError::NotFound { message },
            status => GithubError::Api { status, message },
        }
    }
}

/// Result type.
pub type Result<T> = std::result::Result<T, GithubError>;

/// Treat a lookup of a single resource which does not exist as `None`
/// rather than as an error.
pub fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(GithubError::NotFound { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
