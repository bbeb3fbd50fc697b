//! Tools for interfacing with the Git repository.

mod config;
mod remote;
mod repo;
mod run;

pub use config::{Config, GetConfigValue};
pub use remote::{add_remote, push_branch, remove_remote, RemoteRemoval};
pub use repo::{Error as RepoError, Repo, Result as RepoResult};
pub use run::{GitRunInfo, GitRunOpts, GitRunResult};
