//! The `shifter` workflows: pushing the current branch to a scratch
//! repository, exporting the resulting pull request, and cleaning up.

#![warn(missing_docs)]
#![warn(
    clippy::all,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro
)]
#![allow(clippy::too_many_arguments, clippy::blocks_in_conditions)]

mod clean;
mod push;
mod show;

use std::fmt::Write;

use lib::core::effects::Effects;
use lib::core::scratch::{resolve_scratch_repo_name, ScratchRepoError};
use lib::git::{remove_remote, GitRunInfo, RemoteRemoval, Repo};
use lib::util::{ExitCode, EyreExitOr};
use tracing::info;

pub use clean::clean;
pub use push::push;
pub use show::show;

/// Report a scratch repository which cannot be used. Errors from the hosted
/// API are not policy decisions, so they are propagated instead.
fn report_scratch_repo_error<T>(effects: &Effects, err: ScratchRepoError) -> EyreExitOr<T> {
    match err {
        ScratchRepoError::Github(err) => Err(err.into()),
        err @ (ScratchRepoError::PublicRepository { .. }
        | ScratchRepoError::DescriptionMismatch { .. }
        | ScratchRepoError::NotFound { .. }
        | ScratchRepoError::InvalidWorkingDirectory { .. }) => {
            info!(%err, "Refusing to use scratch repository");
            writeln!(
                effects.get_error_stream(),
                "{}",
                effects.get_glyphs().render_error(&err)
            )?;
            Ok(Err(ExitCode(1)))
        }
    }
}

/// Determine the name of the scratch repository, reporting a working copy
/// which cannot be named.
fn resolve_name(effects: &Effects, repo: &Repo) -> EyreExitOr<String> {
    match resolve_scratch_repo_name(repo) {
        Ok(name) => Ok(Ok(name)),
        Err(err) => match err.downcast::<ScratchRepoError>() {
            Ok(err) => report_scratch_repo_error(effects, err),
            Err(err) => Err(err),
        },
    }
}

/// Remove the remote pointing at the scratch repository, telling the user if
/// there was nothing to remove.
fn remove_scratch_remote(
    effects: &Effects,
    git_run_info: &GitRunInfo,
    repo: &Repo,
    remote_name: &str,
) -> eyre::Result<()> {
    match remove_remote(git_run_info, repo, remote_name)? {
        RemoteRemoval::Removed => {}
        RemoteRemoval::WasAbsent => {
            writeln!(effects.get_output_stream(), "Not necessary to remove remote")?;
        }
    }
    Ok(())
}
