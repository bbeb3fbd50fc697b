use std::fmt::Write;

use lib::core::config::REMOTE_NAME;
use lib::core::effects::Effects;
use lib::core::scratch::resolve_owned_scratch_repository;
use lib::core::session::Session;
use lib::git::{GitRunInfo, Repo};
use lib::github::GithubApi;
use lib::try_exit_code;
use lib::util::EyreExitOr;
use tracing::{info, instrument};

use crate::{remove_scratch_remote, report_scratch_repo_error, resolve_name};

/// Delete the scratch repository from the hosted service, then remove the
/// local remote which pointed at it.
#[instrument]
pub fn clean<C: GithubApi>(
    effects: &Effects,
    git_run_info: &GitRunInfo,
    repo: &Repo,
    session: &Session<C>,
) -> EyreExitOr<()> {
    let name = try_exit_code!(resolve_name(effects, repo)?);
    let repository = match resolve_owned_scratch_repository(session, &name) {
        Ok(repository) => repository,
        Err(err) => return report_scratch_repo_error(effects, err),
    };

    info!(full_name = %repository.full_name, "Deleting scratch repository");
    session
        .github
        .delete_repository(&repository.owner.login, &repository.name)?;
    writeln!(
        effects.get_output_stream(),
        "{}",
        effects
            .get_glyphs()
            .render_success("GitHub temporary repository deleted")
    )?;

    remove_scratch_remote(effects, git_run_info, repo, REMOTE_NAME)?;
    Ok(Ok(()))
}
