//! Read-only operations on the Git repository. Mutating operations (such as
//! reconfiguring remotes or pushing) are carried out by invoking Git itself;
//! see [`crate::git::GitRunInfo`].
//!
//! This module exists for a few reasons:
//!
//! - To ensure that every call to a Git operation has an associated error
//!   variant describing what was being attempted.
//! - To improve the interface in some cases. In particular, some operations in
//!   `git2` return an `Error` with code `ENOTFOUND`, but we should really return
//!   an `Option` in those cases.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::git::config::Config;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not open repository: {0}")]
    OpenRepo(#[source] git2::Error),

    #[error("could not read config: {0}")]
    ReadConfig(#[source] git2::Error),

    #[error("could not find reference {name:?}: {source}")]
    FindReference { source: git2::Error, name: String },

    #[error("could not get remote names: {0}")]
    GetRemoteNames(#[source] git2::Error),

    #[error("this repository does not have an associated working copy")]
    NoWorkingCopyPath,

    #[error("could not read current directory: {0}")]
    Io(#[source] std::io::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper around `git2::Repository`.
pub struct Repo {
    inner: git2::Repository,
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<Git repository at: {:?}>", self.get_path())
    }
}

impl Repo {
    /// Get the Git repository associated with the given directory.
    #[instrument]
    pub fn from_dir(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path).map_err(Error::OpenRepo)?;
        Ok(Repo { inner: repo })
    }

    /// Get the Git repository associated with the current directory.
    #[instrument]
    pub fn from_current_dir() -> Result<Self> {
        let path = std::env::current_dir().map_err(Error::Io)?;
        Repo::from_dir(&path)
    }

    /// Get the path to the `.git` directory for the repository.
    pub fn get_path(&self) -> &Path {
        self.inner.path()
    }

    /// Get the path to the working copy for this repository. If the repository
    /// is bare (has no working copy), returns `None`.
    pub fn get_working_copy_path(&self) -> Option<PathBuf> {
        self.inner.workdir().map(|workdir| workdir.to_owned())
    }

    /// Get the configuration object for the repository.
    ///
    /// **Warning**: This object should only be used for read operations. Write
    /// operations should go through `git config` so that the user sees the
    /// same configuration file that Git itself would write to.
    #[instrument]
    pub fn get_readonly_config(&self) -> Result<Config> {
        let config = self.inner.config().map_err(Error::ReadConfig)?;
        Ok(Config::from(config))
    }

    /// Get the name of the branch that `HEAD` points to, with the
    /// `refs/heads/` prefix stripped. Returns `None` if `HEAD` is detached.
    ///
    /// The branch does not need to have any commits yet.
    #[instrument]
    pub fn get_current_branch_name(&self) -> Result<Option<String>> {
        let head = match self.inner.find_reference("HEAD") {
            Ok(head) => head,
            Err(err) if err.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(err) => {
                return Err(Error::FindReference {
                    source: err,
                    name: "HEAD".to_string(),
                })
            }
        };
        let branch_name = match head.kind() {
            Some(git2::ReferenceType::Symbolic) => head.symbolic_target().map(|target| {
                target
                    .strip_prefix("refs/heads/")
                    .unwrap_or(target)
                    .to_owned()
            }),
            Some(git2::ReferenceType::Direct) | None => None,
        };
        Ok(branch_name)
    }

    /// Get a list of all remote names.
    #[instrument]
    pub fn get_all_remote_names(&self) -> Result<Vec<String>> {
        let remotes = self.inner.remotes().map_err(Error::GetRemoteNames)?;
        Ok(remotes
            .into_iter()
            .enumerate()
            .filter_map(|(i, remote_name)| match remote_name {
                Some(remote_name) => Some(remote_name.to_owned()),
                None => {
                    warn!(remote_index = i, "Remote name could not be decoded");
                    None
                }
            })
            .sorted()
            .collect())
    }

    /// Determine whether a remote with the given name is configured.
    #[instrument]
    pub fn has_remote(&self, remote_name: &str) -> Result<bool> {
        let remote_names = self.get_all_remote_names()?;
        Ok(remote_names.iter().any(|name| name == remote_name))
    }

    /// Get the URL configured for the given remote, if the remote exists.
    #[instrument]
    pub fn get_remote_url(&self, remote_name: &str) -> Result<Option<String>> {
        match self.inner.find_remote(remote_name) {
            Ok(remote) => Ok(remote.url().map(|url| url.to_owned())),
            Err(err) if err.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(err) => Err(Error::FindReference {
                source: err,
                name: format!("remote.{remote_name}"),
            }),
        }
    }
}
