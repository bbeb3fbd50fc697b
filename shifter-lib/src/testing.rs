//! Testing utilities.
//!
//! This is inside `src` rather than `tests` since we use this code in the
//! integration tests of several crates.

use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::io;
use std::ops::Deref;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use eyre::Context;
use itertools::Itertools;
use lazy_static::lazy_static;
use once_cell::sync::OnceCell;
use regex::{Captures, Regex};
use tempfile::TempDir;
use tracing::instrument;

use crate::core::config::env_vars::get_path_to_git;
use crate::core::credentials::Token;
use crate::core::effects::Effects;
use crate::core::formatting::Glyphs;
use crate::core::session::Session;
use crate::git::{GitRunInfo, Repo};
use crate::github::testing::MockGithubClient;

const DUMMY_NAME: &str = "Testy McTestface";
const DUMMY_EMAIL: &str = "test@example.com";
const DUMMY_DATE: &str = "Wed 29 Oct 12:34:56 2020 PDT";

/// The login which test sessions are authenticated as.
pub const DUMMY_LOGIN: &str = "octocat";

/// The credential token which test sessions are authenticated with.
pub const DUMMY_TOKEN: &str = "ghp_0123456789abcdef";

/// Wrapper around the Git executable, for testing.
#[derive(Clone, Debug)]
pub struct Git {
    /// The path to the repository on disk. The directory itself must exist,
    /// although it might not have a `.git` folder in it. (Use `Git::init_repo`
    /// to initialize it.)
    pub repo_path: PathBuf,

    /// The path to the Git executable on disk.
    pub path_to_git: PathBuf,
}

/// Options for `Git::init_repo_with_options`.
#[derive(Debug)]
pub struct GitInitOptions {
    /// If `true`, then `init_repo_with_options` makes an initial commit with
    /// some content.
    pub make_initial_commit: bool,
}

impl Default for GitInitOptions {
    fn default() -> Self {
        GitInitOptions {
            make_initial_commit: true,
        }
    }
}

/// Options for `Git::run_with_options`.
#[derive(Debug, Default)]
pub struct GitRunOptions {
    /// The timestamp of the command. Mostly useful for `git commit`. This should
    /// be a number like 0, 1, 2, 3...
    pub time: isize,

    /// The exit code that `Git` should return.
    pub expected_exit_code: i32,

    /// Additional environment variables to start the process with.
    pub env: HashMap<String, String>,
}

impl Git {
    /// Constructor.
    pub fn new(path_to_git: PathBuf, repo_path: PathBuf) -> Self {
        Git {
            repo_path,
            path_to_git,
        }
    }

    /// Replace dynamic strings in the output, for testing purposes.
    pub fn preprocess_output(&self, stdout: String) -> eyre::Result<String> {
        let path_to_git = self
            .path_to_git
            .to_str()
            .ok_or_else(|| eyre::eyre!("Could not convert path to Git to string"))?;
        let output = stdout.replace(path_to_git, "<git-executable>");

        let repo_path = std::fs::canonicalize(&self.repo_path)?;
        let repo_path = repo_path
            .to_str()
            .ok_or_else(|| eyre::eyre!("Could not convert repo path to string"))?;
        let output = output.replace(repo_path, "<repo-path>");

        lazy_static! {
            // Simulate clearing the terminal line by searching for the
            // appropriate sequences of characters and removing the line
            // preceding them. `git push` reports its progress this way.
            static ref CLEAR_LINE_RE: Regex = Regex::new(r"(^|\n).*(\r|\x1B\[K)").unwrap();
        }
        let output = CLEAR_LINE_RE
            .replace_all(&output, |captures: &Captures| {
                // Restore the leading newline, if any.
                captures[1].to_string()
            })
            .into_owned();

        Ok(output)
    }

    /// Get the environment variables needed to run git in the test environment.
    pub fn get_base_env(&self, time: isize) -> Vec<(OsString, OsString)> {
        // Required for determinism, as these values will be baked into the commit
        // hash.
        let date: OsString = format!("{DUMMY_DATE} -{time:0>2}").into();

        let envs = vec![
            ("GIT_CONFIG_NOSYSTEM", OsString::from("1")),
            ("GIT_CONFIG_GLOBAL", OsString::from("/dev/null")),
            ("GIT_AUTHOR_DATE", date.clone()),
            ("GIT_COMMITTER_DATE", date),
            ("GIT_EDITOR", OsString::from(":")),
            ("GIT_TERMINAL_PROMPT", OsString::from("0")),
            ("PATH", std::env::var_os("PATH").unwrap_or_default()),
        ];

        envs.into_iter()
            .map(|(key, value)| (OsString::from(key), value))
            .collect()
    }

    #[instrument]
    fn run_with_options_inner(
        &self,
        args: &[&str],
        options: &GitRunOptions,
    ) -> eyre::Result<(String, String)> {
        let GitRunOptions {
            time,
            expected_exit_code,
            env,
        } = options;

        let env: BTreeMap<_, _> = self
            .get_base_env(*time)
            .into_iter()
            .chain(
                env.iter()
                    .map(|(k, v)| (OsString::from(k), OsString::from(v))),
            )
            .collect();
        let result = Command::new(&self.path_to_git)
            .current_dir(&self.repo_path)
            .args(args)
            .env_clear()
            .envs(&env)
            .output()
            .wrap_err_with(|| {
                format!(
                    "Running git
                    Executable: {:?}
                    Args: {:?}
                    Env: <not shown>",
                    &self.path_to_git, &args
                )
            })?;

        let exit_code = result
            .status
            .code()
            .ok_or_else(|| eyre::eyre!("Failed to read exit code from Git process"))?;
        if exit_code != *expected_exit_code {
            eyre::bail!(
                "Git command {:?} {:?} exited with unexpected code {} (expected {})
stdout:
{}
stderr:
{}",
                &self.path_to_git,
                &args,
                exit_code,
                expected_exit_code,
                &String::from_utf8_lossy(&result.stdout),
                &String::from_utf8_lossy(&result.stderr),
            )
        }
        let stdout = String::from_utf8(result.stdout)?;
        let stdout = self.preprocess_output(stdout)?;
        let stderr = String::from_utf8(result.stderr)?;
        let stderr = self.preprocess_output(stderr)?;
        Ok((stdout, stderr))
    }

    /// Run a Git command.
    pub fn run_with_options<S: AsRef<str> + std::fmt::Debug>(
        &self,
        args: &[S],
        options: &GitRunOptions,
    ) -> eyre::Result<(String, String)> {
        self.run_with_options_inner(
            args.iter().map(|arg| arg.as_ref()).collect_vec().as_slice(),
            options,
        )
    }

    /// Run a Git command.
    pub fn run<S: AsRef<str> + std::fmt::Debug>(
        &self,
        args: &[S],
    ) -> eyre::Result<(String, String)> {
        self.run_with_options(args, &Default::default())
    }

    /// Set up a Git repo in the directory.
    #[instrument]
    pub fn init_repo_with_options(&self, options: &GitInitOptions) -> eyre::Result<()> {
        self.run(&["init"])?;
        self.run(&["config", "user.name", DUMMY_NAME])?;
        self.run(&["config", "user.email", DUMMY_EMAIL])?;
        self.run(&["config", "core.autocrlf", "false"])?;

        if options.make_initial_commit {
            self.commit_file("initial", 0)?;
        }

        Ok(())
    }

    /// Set up a Git repo in the directory with an initial commit.
    pub fn init_repo(&self) -> eyre::Result<()> {
        self.init_repo_with_options(&Default::default())
    }

    /// Write the provided contents to the provided file in the repository root.
    pub fn write_file_txt(&self, name: &str, contents: &str) -> eyre::Result<()> {
        let path = self.repo_path.join(format!("{name}.txt"));
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Commit a file with default contents. The `time` argument is used to set
    /// the commit timestamp, which is factored into the commit hash.
    #[instrument]
    pub fn commit_file(&self, name: &str, time: isize) -> eyre::Result<()> {
        self.write_file_txt(name, &format!("{name} contents\n"))?;
        self.run(&["add", "."])?;
        self.run_with_options(
            &["commit", "-m", &format!("create {name}.txt")],
            &GitRunOptions {
                time,
                ..Default::default()
            },
        )?;
        Ok(())
    }

    /// Create a branch at `HEAD` and check it out.
    pub fn checkout_new_branch(&self, branch_name: &str) -> eyre::Result<()> {
        self.run(&["checkout", "-b", branch_name])?;
        Ok(())
    }

    /// Detach HEAD, so that no branch is checked out.
    #[instrument]
    pub fn detach_head(&self) -> eyre::Result<()> {
        self.run(&["checkout", "--detach"])?;
        Ok(())
    }

    /// Get a `Repo` object for this repository.
    #[instrument]
    pub fn get_repo(&self) -> eyre::Result<Repo> {
        let repo = Repo::from_dir(&self.repo_path)?;
        Ok(repo)
    }

    /// Get the `GitRunInfo` to use for this repository.
    #[instrument]
    pub fn get_git_run_info(&self) -> GitRunInfo {
        GitRunInfo {
            path_to_git: self.path_to_git.clone(),
            working_directory: self.repo_path.clone(),
            env: self.get_base_env(0).into_iter().collect(),
        }
    }
}

/// Wrapper around a `Git` instance which cleans up the repository once dropped.
pub struct GitWrapper {
    #[allow(dead_code)]
    repo_dir: TempDir,
    git: Git,
}

impl Deref for GitWrapper {
    type Target = Git;

    fn deref(&self) -> &Self::Target {
        &self.git
    }
}

static COLOR_EYRE_INSTALL: OnceCell<()> = OnceCell::new();

/// Create a temporary directory for testing and a `Git` instance to use with it.
pub fn make_git() -> eyre::Result<GitWrapper> {
    COLOR_EYRE_INSTALL.get_or_try_init(color_eyre::install)?;

    let repo_dir = tempfile::tempdir()?;
    let path_to_git = get_path_to_git()?;
    let git = Git::new(path_to_git, repo_dir.path().to_path_buf());
    Ok(GitWrapper { repo_dir, git })
}

/// A local repository together with a directory holding the bare
/// repositories which stand in for hosted repositories. Both are cleaned up
/// after this value is dropped.
pub struct GitWrapperWithHostedRepos {
    /// Guard to clean up the containing temporary directory. Make sure to bind
    /// this to a local variable not named `_`.
    pub temp_dir: TempDir,

    /// The wrapper around the local repository. It is not initialized.
    pub repo: Git,

    /// The directory under which hosted repositories are created.
    pub hosted_root: PathBuf,
}

impl GitWrapperWithHostedRepos {
    /// Create an API client whose repositories live under `hosted_root`,
    /// authenticated as [`DUMMY_LOGIN`].
    pub fn make_github(&self) -> MockGithubClient {
        MockGithubClient::new(DUMMY_LOGIN, &self.hosted_root)
    }

    /// Create a session authenticated as [`DUMMY_LOGIN`] with the given
    /// client.
    pub fn make_session(&self, github: MockGithubClient) -> Session<MockGithubClient> {
        Session {
            token: Token::new(DUMMY_TOKEN),
            owner: DUMMY_LOGIN.to_owned(),
            github,
        }
    }

    /// Create a `Git` instance for inspecting the hosted repository with the
    /// given name, owned by [`DUMMY_LOGIN`].
    pub fn get_hosted_repo(&self, name: &str) -> Git {
        Git::new(
            self.repo.path_to_git.clone(),
            self.hosted_root
                .join(DUMMY_LOGIN)
                .join(format!("{name}.git")),
        )
    }
}

/// Create a [`GitWrapperWithHostedRepos`].
pub fn make_git_with_hosted_repos() -> eyre::Result<GitWrapperWithHostedRepos> {
    COLOR_EYRE_INSTALL.get_or_try_init(color_eyre::install)?;

    let path_to_git = get_path_to_git()?;
    let temp_dir = tempfile::tempdir()?;
    let repo_path = temp_dir.path().join("local");
    std::fs::create_dir_all(&repo_path)?;
    let hosted_root = temp_dir.path().join("hosted");
    std::fs::create_dir_all(&hosted_root)?;

    Ok(GitWrapperWithHostedRepos {
        temp_dir,
        repo: Git::new(path_to_git, repo_path),
        hosted_root,
    })
}

/// Output captured from an [`Effects`] created with [`make_test_effects`].
pub struct CapturedOutput {
    stdout: Arc<Mutex<Vec<u8>>>,
    stderr: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Get the output written so far, as `(stdout, stderr)`, with dynamic
    /// strings replaced as per [`Git::preprocess_output`].
    pub fn get(&self, git: &Git) -> eyre::Result<(String, String)> {
        let stdout = match self.stdout.lock() {
            Ok(stdout) => String::from_utf8(stdout.clone())?,
            Err(_) => eyre::bail!("Output buffer lock was poisoned"),
        };
        let stderr = match self.stderr.lock() {
            Ok(stderr) => String::from_utf8(stderr.clone())?,
            Err(_) => eyre::bail!("Output buffer lock was poisoned"),
        };
        Ok((git.preprocess_output(stdout)?, git.preprocess_output(stderr)?))
    }
}

/// Create an [`Effects`] which writes into buffers that can be inspected
/// afterwards.
pub fn make_test_effects() -> (Effects, CapturedOutput) {
    let stdout = Arc::new(Mutex::new(Vec::new()));
    let stderr = Arc::new(Mutex::new(Vec::new()));
    let effects = Effects::new_from_buffer_for_test(Glyphs::text(), &stdout, &stderr);
    (effects, CapturedOutput { stdout, stderr })
}

struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "buffer lock was poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` and collect every `tracing` event at `WARN` level or above that it
/// emits on the current thread, rendered without timestamps or colors.
pub fn collect_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .with_writer({
            let buffer = Arc::clone(&buffer);
            move || SharedBuffer(Arc::clone(&buffer))
        })
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = match buffer.lock() {
        Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => String::from("<buffer lock was poisoned>"),
    };
    (result, warnings)
}
