//! Exporting the discussion on the latest pull request of the scratch
//! repository as a plain-text document.

use std::fmt::Write;

use thiserror::Error;
use tracing::instrument;

use crate::core::session::Session;
use crate::github::{Comment, GithubApi, GithubError, Issue, Repository};

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No pull requests found in {full_name}")]
    NoPullRequests { full_name: String },

    #[error(transparent)]
    Github(#[from] GithubError),
}

/// Select the most recently created issue, given issues in ascending order
/// of creation.
pub fn select_latest(issues: Vec<Issue>) -> Option<Issue> {
    issues.into_iter().last()
}

/// Render an issue and its comments, in order.
pub fn render_pull_request(issue: &Issue, comments: &[Comment]) -> String {
    let mut result = String::new();
    // Writing to a `String` cannot fail.
    let _ = write!(
        result,
        "== Pull Request {} ==\n\n{}\n\n",
        issue.number,
        issue.body.as_deref().unwrap_or_default()
    );
    for (i, comment) in comments.iter().enumerate() {
        let _ = write!(
            result,
            "=== Comment {} ===\n\n{}\n\n",
            i + 1,
            comment.body.as_deref().unwrap_or_default()
        );
    }
    result
}

/// Fetch the latest issue or pull request of `repository` and its comments,
/// and render them.
#[instrument]
pub fn export_latest_pull_request<C: GithubApi>(
    session: &Session<C>,
    repository: &Repository,
) -> Result<String, ExportError> {
    let Session { github, .. } = session;
    let owner = &repository.owner.login;
    let issues = github.list_issues(owner, &repository.name)?;
    let issue = select_latest(issues).ok_or_else(|| ExportError::NoPullRequests {
        full_name: repository.full_name.clone(),
    })?;
    let comments = github.list_issue_comments(owner, &repository.name, issue.number)?;
    Ok(render_pull_request(&issue, &comments))
}
