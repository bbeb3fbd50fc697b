use std::fmt::Write;

use lib::core::effects::Effects;
use lib::core::export::{export_latest_pull_request, ExportError};
use lib::core::scratch::resolve_owned_scratch_repository;
use lib::core::session::Session;
use lib::git::Repo;
use lib::github::GithubApi;
use lib::try_exit_code;
use lib::util::{ExitCode, EyreExitOr};
use tracing::instrument;

use crate::{report_scratch_repo_error, resolve_name};

/// Print the latest pull request of the scratch repository, along with its
/// comments. The document is written to stdout so that it can be redirected
/// to a file.
#[instrument]
pub fn show<C: GithubApi>(
    effects: &Effects,
    repo: &Repo,
    session: &Session<C>,
) -> EyreExitOr<()> {
    let name = try_exit_code!(resolve_name(effects, repo)?);
    let repository = match resolve_owned_scratch_repository(session, &name) {
        Ok(repository) => repository,
        Err(err) => return report_scratch_repo_error(effects, err),
    };

    match export_latest_pull_request(session, &repository) {
        Ok(document) => {
            write!(effects.get_output_stream(), "{document}")?;
            Ok(Ok(()))
        }
        Err(err @ ExportError::NoPullRequests { .. }) => {
            writeln!(
                effects.get_error_stream(),
                "{}",
                effects.get_glyphs().render_error(&err)
            )?;
            Ok(Err(ExitCode(1)))
        }
        Err(ExportError::Github(err)) => Err(err.into()),
    }
}
