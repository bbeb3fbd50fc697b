//! Loading the credential token used to talk to the hosted API.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use crate::core::config::TOKEN_SETTINGS_URL;

/// A credential token for the hosted API. Its contents are never displayed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap the given token. Surrounding whitespace is removed.
    pub fn new(token: &str) -> Self {
        Token(token.trim().to_owned())
    }

    /// Get the secret contents, to be sent to the hosted API or embedded in
    /// a remote URL.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Token redacted>")
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("token file {path:?} does not exist")]
    Missing { path: PathBuf },

    #[error("could not read token file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("token file {path:?} is empty")]
    Empty { path: PathBuf },
}

impl CredentialError {
    /// The path of the token file which could not be loaded.
    pub fn get_path(&self) -> &Path {
        match self {
            CredentialError::Missing { path }
            | CredentialError::Unreadable { path, source: _ }
            | CredentialError::Empty { path } => path,
        }
    }
}

/// Read the credential token stored at `path`.
#[instrument]
pub fn load_token(path: &Path) -> Result<Token, CredentialError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CredentialError::Missing {
                path: path.to_owned(),
            })
        }
        Err(err) => {
            return Err(CredentialError::Unreadable {
                path: path.to_owned(),
                source: err,
            })
        }
    };

    let token = Token::new(&contents);
    if token.expose().is_empty() {
        return Err(CredentialError::Empty {
            path: path.to_owned(),
        });
    }
    Ok(token)
}

/// Instructions for obtaining a token and placing it at `path`.
pub fn get_token_guidance(path: &Path) -> String {
    format!(
        r#"Go to {TOKEN_SETTINGS_URL}, create a token with the "repo" and "delete_repo" scopes, and put it into {}"#,
        path.display()
    )
}
