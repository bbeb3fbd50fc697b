use std::fmt::Write;

use lib::core::config::{get_transport, REMOTE_NAME, SHIFT_SERVICE_URL};
use lib::core::effects::Effects;
use lib::core::scratch::{build_remote_url, ensure_scratch_repository};
use lib::core::session::Session;
use lib::git::{add_remote, push_branch, GitRunInfo, Repo};
use lib::github::GithubApi;
use lib::try_exit_code;
use lib::util::{ExitCode, EyreExitOr};
use tracing::{info, instrument};

use crate::{remove_scratch_remote, report_scratch_repo_error, resolve_name};

/// Push the current branch to the scratch repository, creating the
/// repository first if it does not exist, and tell the user how to continue.
#[instrument]
pub fn push<C: GithubApi>(
    effects: &Effects,
    git_run_info: &GitRunInfo,
    repo: &Repo,
    session: &Session<C>,
) -> EyreExitOr<()> {
    let name = try_exit_code!(resolve_name(effects, repo)?);
    let repository = match ensure_scratch_repository(session, &name) {
        Ok(repository) => repository,
        Err(err) => return report_scratch_repo_error(effects, err),
    };

    let branch_name = match repo.get_current_branch_name()? {
        Some(branch_name) => branch_name,
        None => {
            writeln!(
                effects.get_error_stream(),
                "{}",
                effects
                    .get_glyphs()
                    .render_error("HEAD is detached; check out the branch to push first")
            )?;
            return Ok(Err(ExitCode(1)));
        }
    };
    info!(?branch_name, full_name = %repository.full_name, "Pushing branch");

    let transport = get_transport(repo)?;
    let url = build_remote_url(&repository, transport, &session.owner, &session.token)?;
    remove_scratch_remote(effects, git_run_info, repo, REMOTE_NAME)?;
    add_remote(git_run_info, REMOTE_NAME, &url)?;

    writeln!(effects.get_output_stream(), "Pushing...")?;
    try_exit_code!(push_branch(
        effects,
        git_run_info,
        REMOTE_NAME,
        &branch_name
    )?);
    writeln!(effects.get_output_stream(), "done")?;

    let glyphs = effects.get_glyphs();
    writeln!(
        effects.get_output_stream(),
        "\
Now please go to {SHIFT_SERVICE_URL}, purchase a shift and enter the following repository name:
{full_name}
And this branch:
{branch}
After the shift is finished, review the pull request on GitHub, then merge it back into your local repository using:
git fetch {REMOTE_NAME} && git merge {REMOTE_NAME}/{branch_name}",
        full_name = glyphs.render_emphasis(&repository.full_name),
        branch = glyphs.render_emphasis(&branch_name),
    )?;
    Ok(Ok(()))
}
