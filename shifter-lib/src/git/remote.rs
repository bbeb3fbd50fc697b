//! Reconfiguring remotes and pushing to them.

use tracing::{info, instrument};

use crate::core::effects::Effects;
use crate::git::{GitRunInfo, GitRunOpts, Repo};
use crate::util::EyreExitOr;

/// The outcome of removing a remote. Both outcomes are considered successful.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteRemoval {
    /// The remote existed and has been removed.
    Removed,

    /// There was no remote with the given name, so nothing was done.
    WasAbsent,
}

/// Remove the remote with the given name, if it exists.
#[instrument]
pub fn remove_remote(
    git_run_info: &GitRunInfo,
    repo: &Repo,
    remote_name: &str,
) -> eyre::Result<RemoteRemoval> {
    if !repo.has_remote(remote_name)? {
        info!(?remote_name, "Remote does not exist, not removing");
        return Ok(RemoteRemoval::WasAbsent);
    }

    git_run_info.run_silent(&["remote", "remove", remote_name], Default::default())?;
    Ok(RemoteRemoval::Removed)
}

/// Add a remote with the given name pointing to `url`.
///
/// The URL may carry credentials, so it is neither logged nor included in
/// the error message.
#[instrument(skip(url))]
pub fn add_remote(git_run_info: &GitRunInfo, remote_name: &str, url: &str) -> eyre::Result<()> {
    let result = git_run_info.run_silent(
        &["remote", "add", remote_name, url],
        GitRunOpts {
            treat_git_failure_as_error: false,
        },
    )?;
    if !result.exit_code.is_success() {
        eyre::bail!(
            "Could not add remote {remote_name:?} (exit code {}): {}",
            result.exit_code.0,
            String::from_utf8_lossy(&result.stderr).trim_end()
        );
    }
    Ok(())
}

/// Push the given local branch to the given remote. The output of `git push`
/// is shown to the user.
#[instrument]
pub fn push_branch(
    effects: &Effects,
    git_run_info: &GitRunInfo,
    remote_name: &str,
    branch_name: &str,
) -> EyreExitOr<()> {
    git_run_info.run(effects, &["push", remote_name, branch_name])
}
