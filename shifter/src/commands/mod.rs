//! Sub-commands of `shifter`.

use std::fmt::Write;

use lib::core::config::get_token_path;
use lib::core::effects::Effects;
use lib::core::session::authenticate;
use lib::git::Repo;
use lib::github::HttpGithubClient;
use lib::try_exit_code;
use lib::util::EyreExitOr;
use shifter_invoke::CommandContext;
use shifter_opts::{Command, Opts};
use tracing::info;

const LIFECYCLE_HELP: &str = "\
You can use the following commands (in the order of the lifecycle):

shifter push (step 1)
(do your shift now)
(merge back)
shifter show > my-shift.md (show the latest pull request, dump it to a file)
shifter clean (remove the repository from GitHub)";

/// Describe the order in which the subcommands are meant to be run.
pub fn print_lifecycle_help(effects: &Effects) -> eyre::Result<()> {
    writeln!(effects.get_output_stream(), "{LIFECYCLE_HELP}")?;
    Ok(())
}

fn command_main(ctx: CommandContext, opts: Opts) -> EyreExitOr<()> {
    let CommandContext {
        effects,
        git_run_info,
    } = ctx;
    let Opts { command } = opts;

    let command = match command {
        Some(command) => command,
        None => {
            print_lifecycle_help(&effects)?;
            return Ok(Ok(()));
        }
    };

    let token_path = get_token_path()?;
    let session = try_exit_code!(authenticate(&effects, &token_path, |token| Ok(
        HttpGithubClient::new(token)?
    ))?);
    let repo = Repo::from_current_dir()?;
    info!(?command, owner = %session.owner, "Dispatching command");

    match command {
        Command::Push => shifter_relay::push(&effects, &git_run_info, &repo, &session),
        Command::Show => shifter_relay::show(&effects, &repo, &session),
        Command::Clean => shifter_relay::clean(&effects, &git_run_info, &repo, &session),
    }
}

/// Execute the main process and exit with the appropriate exit code.
pub fn main() {
    shifter_invoke::invoke_main(command_main)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use lib::core::formatting::Glyphs;

    use super::*;

    #[test]
    fn test_print_lifecycle_help() -> eyre::Result<()> {
        let stdout = Arc::new(Mutex::new(Vec::new()));
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let effects = Effects::new_from_buffer_for_test(Glyphs::text(), &stdout, &stderr);
        print_lifecycle_help(&effects)?;

        let stdout = String::from_utf8(stdout.lock().unwrap().clone())?;
        insta::assert_snapshot!(stdout, @r###"
        You can use the following commands (in the order of the lifecycle):

        shifter push (step 1)
        (do your shift now)
        (merge back)
        shifter show > my-shift.md (show the latest pull request, dump it to a file)
        shifter clean (remove the repository from GitHub)
        "###);
        Ok(())
    }
}
