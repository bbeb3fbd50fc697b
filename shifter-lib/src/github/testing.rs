//! An in-memory stand-in for the hosted API, for testing.
//!
//! Repositories created through [`MockGithubClient`] are backed by real bare
//! Git repositories on disk, so that pushing to them works.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{
    Comment, CreateRepositoryRequest, GithubApi, GithubError, Issue, Repository, Result, User,
};

const DUMMY_DATE: &str = "2020-10-29T12:34:56Z";

/// A call made to the [`MockGithubClient`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
    GetCurrentUser,
    FindRepository { owner: String, name: String },
    CreateRepository(CreateRepositoryRequest),
    DeleteRepository { owner: String, name: String },
    ListIssues { owner: String, name: String },
    ListIssueComments { owner: String, name: String, number: u64 },
}

/// The host named in the HTTPS clone URLs of mock repositories. It does not
/// resolve; map it onto [`MockGithubClient::get_remote_path`] with
/// `url.<base>.insteadOf` to push over HTTPS.
pub const MOCK_HOST: &str = "github.invalid";

#[derive(Debug, Default)]
struct MockState {
    repositories: BTreeMap<String, Repository>,
    issues: BTreeMap<String, Vec<Issue>>,
    comments: BTreeMap<(String, u64), Vec<Comment>>,
    calls: Vec<MockCall>,
    reject_credentials: bool,
}

/// Implementation of [`GithubApi`] which keeps its state in memory and
/// records every call made to it.
#[derive(Debug)]
pub struct MockGithubClient {
    login: String,
    remote_root: PathBuf,
    state: RefCell<MockState>,
}

fn full_name(owner: &str, name: &str) -> String {
    format!("{owner}/{name}")
}

impl MockGithubClient {
    /// Constructor. Calls are attributed to `login`, and repositories are
    /// stored as bare repositories under `remote_root`.
    pub fn new(login: &str, remote_root: &Path) -> Self {
        Self {
            login: login.to_owned(),
            remote_root: remote_root.to_owned(),
            state: Default::default(),
        }
    }

    /// Make every subsequent call fail as if the credentials were revoked.
    pub fn reject_credentials(&self) {
        self.state.borrow_mut().reject_credentials = true;
    }

    /// The path on disk of the bare repository backing the given hosted
    /// repository.
    pub fn get_remote_path(&self, owner: &str, name: &str) -> PathBuf {
        self.remote_root.join(owner).join(format!("{name}.git"))
    }

    fn make_repository(
        &self,
        owner: &str,
        name: &str,
        private: bool,
        description: Option<&str>,
    ) -> Result<Repository> {
        let path = self.get_remote_path(owner, name);
        git2::Repository::init_bare(&path).map_err(|err| GithubError::Api {
            status: 500,
            message: format!("could not initialize {path:?}: {err}"),
        })?;
        Ok(Repository {
            name: name.to_owned(),
            full_name: full_name(owner, name),
            owner: User {
                login: owner.to_owned(),
            },
            private,
            description: description.map(ToOwned::to_owned),
            clone_url: format!("https://{MOCK_HOST}/{owner}/{name}.git"),
            ssh_url: path.to_string_lossy().into_owned(),
        })
    }

    /// Seed a repository owned by the authenticated user, as if it had been
    /// created outside of the tool.
    pub fn add_repository(
        &self,
        name: &str,
        private: bool,
        description: Option<&str>,
    ) -> Result<Repository> {
        let repository = self.make_repository(&self.login, name, private, description)?;
        self.state
            .borrow_mut()
            .repositories
            .insert(repository.full_name.clone(), repository.clone());
        Ok(repository)
    }

    /// Seed an issue or pull request on the given repository. Issues must be
    /// added in ascending order of creation.
    pub fn add_issue(&self, full_name: &str, number: u64, title: &str, body: Option<&str>) {
        let issue = Issue {
            number,
            title: title.to_owned(),
            body: body.map(ToOwned::to_owned),
            created_at: DUMMY_DATE.to_owned(),
        };
        self.state
            .borrow_mut()
            .issues
            .entry(full_name.to_owned())
            .or_default()
            .push(issue);
    }

    /// Seed a comment on the given issue. Comments must be added in ascending
    /// order of creation.
    pub fn add_comment(&self, full_name: &str, number: u64, body: Option<&str>) {
        let comment = Comment {
            body: body.map(ToOwned::to_owned),
            user: User {
                login: self.login.clone(),
            },
            created_at: DUMMY_DATE.to_owned(),
        };
        self.state
            .borrow_mut()
            .comments
            .entry((full_name.to_owned(), number))
            .or_default()
            .push(comment);
    }

    /// Get the repository with the given full name, if it exists.
    pub fn get_repository(&self, full_name: &str) -> Option<Repository> {
        self.state.borrow().repositories.get(full_name).cloned()
    }

    /// Get all calls made so far, in order.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.state.borrow().calls.clone()
    }

    /// Count the calls made so far which match the given predicate.
    pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.reject_credentials {
            return Err(GithubError::Unauthorized {
                message: "Bad credentials".to_owned(),
            });
        }
        Ok(())
    }

    fn not_found() -> GithubError {
        GithubError::NotFound {
            message: "Not Found".to_owned(),
        }
    }
}

impl GithubApi for MockGithubClient {
    fn get_current_user(&self) -> Result<User> {
        self.record(MockCall::GetCurrentUser)?;
        Ok(User {
            login: self.login.clone(),
        })
    }

    fn find_repository(&self, owner: &str, name: &str) -> Result<Option<Repository>> {
        self.record(MockCall::FindRepository {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })?;
        Ok(self.get_repository(&full_name(owner, name)))
    }

    fn create_repository(&self, request: &CreateRepositoryRequest) -> Result<Repository> {
        self.record(MockCall::CreateRepository(request.clone()))?;
        let CreateRepositoryRequest {
            name,
            description,
            homepage: _,
            private,
        } = request;
        if self.get_repository(&full_name(&self.login, name)).is_some() {
            return Err(GithubError::Api {
                status: 422,
                message: "Repository creation failed.".to_owned(),
            });
        }

        let repository =
            self.make_repository(&self.login, name, *private, Some(description.as_str()))?;
        self.state
            .borrow_mut()
            .repositories
            .insert(repository.full_name.clone(), repository.clone());
        Ok(repository)
    }

    fn delete_repository(&self, owner: &str, name: &str) -> Result<()> {
        self.record(MockCall::DeleteRepository {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })?;
        let removed = self
            .state
            .borrow_mut()
            .repositories
            .remove(&full_name(owner, name));
        match removed {
            Some(_) => {
                let path = self.get_remote_path(owner, name);
                std::fs::remove_dir_all(&path).map_err(|err| GithubError::Api {
                    status: 500,
                    message: format!("could not remove {path:?}: {err}"),
                })
            }
            None => Err(Self::not_found()),
        }
    }

    fn list_issues(&self, owner: &str, name: &str) -> Result<Vec<Issue>> {
        self.record(MockCall::ListIssues {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })?;
        let full_name = full_name(owner, name);
        if self.get_repository(&full_name).is_none() {
            return Err(Self::not_found());
        }
        Ok(self
            .state
            .borrow()
            .issues
            .get(&full_name)
            .cloned()
            .unwrap_or_default())
    }

    fn list_issue_comments(&self, owner: &str, name: &str, number: u64) -> Result<Vec<Comment>> {
        self.record(MockCall::ListIssueComments {
            owner: owner.to_owned(),
            name: name.to_owned(),
            number,
        })?;
        Ok(self
            .state
            .borrow()
            .comments
            .get(&(full_name(owner, name), number))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_delete_repository() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let github = MockGithubClient::new("octocat", dir.path());
        assert_eq!(github.find_repository("octocat", "shift")?, None);

        let repository = github.create_repository(&CreateRepositoryRequest {
            name: "shift".to_owned(),
            description: "scratch".to_owned(),
            homepage: String::new(),
            private: true,
        })?;
        assert_eq!(repository.full_name, "octocat/shift");
        assert!(github.get_remote_path("octocat", "shift").join("HEAD").exists());
        assert_eq!(
            github.find_repository("octocat", "shift")?,
            Some(repository)
        );

        github.delete_repository("octocat", "shift")?;
        assert!(!github.get_remote_path("octocat", "shift").exists());
        assert!(matches!(
            github.delete_repository("octocat", "shift"),
            Err(GithubError::NotFound { .. })
        ));
        assert_eq!(
            github.count_calls(|call| matches!(call, MockCall::DeleteRepository { .. })),
            2
        );
        Ok(())
    }

    #[test]
    fn test_reject_credentials() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let github = MockGithubClient::new("octocat", dir.path());
        github.reject_credentials();
        assert!(matches!(
            github.get_current_user(),
            Err(GithubError::Unauthorized { .. })
        ));
        Ok(())
    }
}
