//! Access to the hosted repository service.
//!
//! All calls go through the [`GithubApi`] trait, so that the workflows can be
//! exercised against the in-memory [`testing::MockGithubClient`].

mod client;
mod error;
pub mod testing;
mod types;

pub use client::HttpGithubClient;
pub use error::{optional, GithubError, Result};
pub use types::{Comment, CreateRepositoryRequest, Issue, Repository, User};

/// The operations used against the hosted API. All calls are attributed to
/// the user whose credentials the client was constructed with.
pub trait GithubApi: std::fmt::Debug {
    /// Get the authenticated user.
    fn get_current_user(&self) -> Result<User>;

    /// Look up a repository. Returns `None` if it does not exist.
    fn find_repository(&self, owner: &str, name: &str) -> Result<Option<Repository>>;

    /// Create a repository owned by the authenticated user.
    fn create_repository(&self, request: &CreateRepositoryRequest) -> Result<Repository>;

    /// Delete a repository.
    fn delete_repository(&self, owner: &str, name: &str) -> Result<()>;

    /// List the issues and pull requests of a repository, whether open or
    /// closed, in ascending order of creation.
    fn list_issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>>;

    /// List the comments on an issue or pull request, in ascending order of
    /// creation.
    fn list_issue_comments(&self, owner: &str, name: &str, number: u64) -> Result<Vec<Comment>>;
}
