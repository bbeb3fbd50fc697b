//! Resources exchanged with the hosted API. Only the fields which are
//! actually consulted are modeled; everything else in the responses is
//! ignored.

use serde::{Deserialize, Serialize};

/// An account on the hosted service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The account name, such as `octocat`.
    pub login: String,
}

/// A hosted repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// The short name, such as `shift`.
    pub name: String,

    /// The name qualified by its owner, such as `octocat/shift`.
    pub full_name: String,

    /// The account which owns the repository.
    pub owner: User,

    /// Whether the repository is hidden from the public.
    pub private: bool,

    /// The free-form description. Unset descriptions are reported as `null`.
    pub description: Option<String>,

    /// The URL to clone the repository over HTTPS.
    pub clone_url: String,

    /// The URL to clone the repository over SSH.
    pub ssh_url: String,
}

/// The body of a request to create a repository for the authenticated user.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub private: bool,
}

/// An issue or pull request. The issues endpoint reports both.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub created_at: String,
}

/// A comment on an issue or pull request.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub body: Option<String>,
    pub user: User,
    pub created_at: String,
}
