//! The command-line options for `shifter`.

#![warn(missing_docs)]
#![warn(
    clippy::all,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro
)]
#![allow(clippy::too_many_arguments, clippy::blocks_in_conditions)]
// These URLs are printed verbatim in help output, so we don't want to add extraneous Markdown
// formatting.
#![allow(rustdoc::bare_urls)]

use clap::Parser;

/// `shifter` subcommands, in the order of the lifecycle.
#[derive(Clone, Copy, Debug, Parser, PartialEq, Eq)]
pub enum Command {
    /// Create the private scratch repository on GitHub if needed, and push
    /// the current branch to it.
    Push,

    /// Print the latest pull request of the scratch repository and its
    /// comments, e.g. to dump it to a file with `shifter show > my-shift.md`.
    Show,

    /// Delete the scratch repository from GitHub and remove the `shifter`
    /// remote.
    Clean,
}

/// Hand a branch over to Laravel Shift through a temporary GitHub repository.
///
/// The GitHub token is read from the `.github_token` file next to the
/// executable.
#[derive(Debug, Parser)]
#[clap(name = "shifter", version = env!("CARGO_PKG_VERSION"))]
pub struct Opts {
    /// The `shifter` subcommand to run. If omitted, the lifecycle of a shift
    /// is described.
    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_opts_are_consistent() {
        Opts::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let opts = Opts::try_parse_from(["shifter"]).unwrap();
        assert_eq!(opts.command, None);

        for (arg, expected) in [
            ("push", Command::Push),
            ("show", Command::Show),
            ("clean", Command::Clean),
        ] {
            let opts = Opts::try_parse_from(["shifter", arg]).unwrap();
            assert_eq!(opts.command, Some(expected));
        }
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        let err = Opts::try_parse_from(["shifter", "deploy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        assert_eq!(err.exit_code(), 2);

        let err = Opts::try_parse_from(["shifter", "push", "--force"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
