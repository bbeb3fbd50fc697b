use std::collections::HashMap;
use std::convert::TryInto;
use std::ffi::{OsStr, OsString};
use std::fmt::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use eyre::Context;
use itertools::Itertools;
use tracing::instrument;

use crate::core::effects::Effects;
use crate::util::{ExitCode, EyreExitOr};

/// Path to the `git` executable on disk to be executed.
#[derive(Clone)]
pub struct GitRunInfo {
    /// The path to the Git executable on disk.
    pub path_to_git: PathBuf,

    /// The working directory that the Git executable should be run in.
    pub working_directory: PathBuf,

    /// The environment variables that should be passed to the Git process.
    pub env: HashMap<OsString, OsString>,
}

impl std::fmt::Debug for GitRunInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<GitRunInfo path_to_git={:?} working_directory={:?} env=not shown>",
            self.path_to_git, self.working_directory
        )
    }
}

/// Options for invoking Git.
pub struct GitRunOpts {
    /// If set, a non-zero exit code will be treated as an error.
    pub treat_git_failure_as_error: bool,
}

impl Default for GitRunOpts {
    fn default() -> Self {
        Self {
            treat_git_failure_as_error: true,
        }
    }
}

/// The result of invoking Git.
#[must_use]
pub struct GitRunResult {
    /// The exit code of the process.
    pub exit_code: ExitCode,

    /// The stdout contents written by the invocation.
    pub stdout: Vec<u8>,

    /// The stderr contents written by the invocation.
    pub stderr: Vec<u8>,
}

impl std::fmt::Debug for GitRunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<GitRunResult exit_code={:?} stdout={:?} stderr={:?}>",
            self.exit_code,
            String::from_utf8_lossy(&self.stdout),
            String::from_utf8_lossy(&self.stderr),
        )
    }
}

impl GitRunInfo {
    fn make_command(&self, args: &[&OsStr]) -> Command {
        let GitRunInfo {
            path_to_git,
            working_directory,
            env,
        } = self;
        let mut command = Command::new(path_to_git);
        command.current_dir(working_directory);
        command.args(args);
        command.env_clear();
        command.envs(env.iter());
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        command
    }

    fn run_inner(&self, effects: &Effects, args: &[&OsStr]) -> EyreExitOr<()> {
        let args_string = args
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect_vec()
            .join(" ");
        writeln!(
            effects.get_output_stream(),
            "shifter: running command: {} {}",
            &self.path_to_git.to_string_lossy(),
            &args_string
        )?;

        // The output is collected and forwarded once the process exits, so
        // that no helper threads are needed to drain the pipes.
        let output = self
            .make_command(args)
            .output()
            .wrap_err("Running Git subprocess")?;
        write!(
            effects.get_output_stream(),
            "{}",
            String::from_utf8_lossy(&output.stdout)
        )?;
        write!(
            effects.get_error_stream(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        )?;

        let exit_code: ExitCode = output
            .status
            .try_into()
            .wrap_err("Converting exit code from i32 to isize")?;
        if exit_code.is_success() {
            Ok(Ok(()))
        } else {
            Ok(Err(exit_code))
        }
    }

    /// Run Git in a subprocess, and inform the user.
    ///
    /// This is suitable for commands whose output the user should see, such
    /// as `git push`.
    ///
    /// `args` contains the list of arguments to pass to Git, not including the Git
    /// executable itself.
    ///
    /// Returns the exit code of Git (non-zero signifies error).
    #[instrument]
    #[must_use = "The return code for `GitRunInfo::run` must be checked"]
    pub fn run<S: AsRef<OsStr> + std::fmt::Debug>(
        &self,
        effects: &Effects,
        args: &[S],
    ) -> EyreExitOr<()> {
        self.run_inner(
            effects,
            args.iter().map(AsRef::as_ref).collect_vec().as_slice(),
        )
    }

    fn run_silent_inner(&self, args: &[&OsStr], opts: GitRunOpts) -> eyre::Result<GitRunResult> {
        let GitRunOpts {
            treat_git_failure_as_error,
        } = opts;

        let output = self
            .make_command(args)
            .output()
            .wrap_err("Running Git subprocess")?;
        let exit_code: ExitCode = output.status.try_into()?;
        let result = GitRunResult {
            exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        };
        if treat_git_failure_as_error && !exit_code.is_success() {
            eyre::bail!(
                "Git subprocess failed:\nArgs: {:?}\nResult: {:?}",
                args,
                result
            );
        }
        Ok(result)
    }

    /// Run Git silently (don't display output to the user).
    ///
    /// Note that the arguments are included in the error message if
    /// `treat_git_failure_as_error` is set, so pass `false` and inspect the
    /// exit code when the arguments contain secrets.
    ///
    /// Returns the stdout of the Git invocation.
    pub fn run_silent<S: AsRef<OsStr> + std::fmt::Debug>(
        &self,
        args: &[S],
        opts: GitRunOpts,
    ) -> eyre::Result<GitRunResult> {
        self.run_silent_inner(
            args.iter().map(AsRef::as_ref).collect_vec().as_slice(),
            opts,
        )
    }
}
