//! Accesses repo-specific configuration and the fixed locations the tool
//! depends on.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eyre::Context;
use tracing::instrument;

use crate::git::Repo;

/// The name of the remote which points at the scratch repository.
pub const REMOTE_NAME: &str = "shifter";

/// The description which marks a hosted repository as owned by this tool.
/// Repositories with any other description are never pushed to, exported
/// from, or deleted.
pub const SENTINEL_DESCRIPTION: &str = "Shifter Temporary Repo, can be deleted after shifting";

/// The scratch repository name used when no other name is configured.
pub const DEFAULT_SCRATCH_REPO_NAME: &str = "shift";

/// The file name of the credential token, stored beside the executable.
pub const TOKEN_FILE_NAME: &str = ".github_token";

/// Where the user purchases a shift once the branch has been pushed.
pub const SHIFT_SERVICE_URL: &str = "https://laravelshift.com/shifts";

/// Where the user creates a credential token.
pub const TOKEN_SETTINGS_URL: &str = "https://github.com/settings/tokens";

/// Base URL of the hosted API.
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Get the path to the credential token: a file named [`TOKEN_FILE_NAME`] in
/// the directory containing the running executable.
#[instrument]
pub fn get_token_path() -> eyre::Result<PathBuf> {
    let exe_path = std::env::current_exe().wrap_err("Locating the running executable")?;
    let exe_dir = exe_path.parent().ok_or_else(|| {
        eyre::eyre!("Executable path has no parent directory: {:?}", exe_path)
    })?;
    Ok(get_token_path_in(exe_dir))
}

/// Get the path to the credential token stored in the given directory.
pub fn get_token_path_in(dir: &Path) -> PathBuf {
    dir.join(TOKEN_FILE_NAME)
}

/// An invalid value was found for a configuration key.
#[derive(Debug, thiserror::Error)]
#[error("invalid value {value:?} for config key {key}, expected one of: {expected}")]
pub struct InvalidConfigValue {
    key: &'static str,
    value: String,
    expected: &'static str,
}

/// How the scratch repository is named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScratchRepoNaming {
    /// Use a fixed name, `shift` unless `shifter.scratchRepoName` is set.
    #[default]
    Fixed,

    /// Use the base name of the working copy's root directory.
    Directory,
}

impl ScratchRepoNaming {
    const CONFIG_KEY: &'static str = "shifter.scratchRepoNaming";
}

impl FromStr for ScratchRepoNaming {
    type Err = InvalidConfigValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(ScratchRepoNaming::Fixed),
            "directory" => Ok(ScratchRepoNaming::Directory),
            other => Err(InvalidConfigValue {
                key: Self::CONFIG_KEY,
                value: other.to_owned(),
                expected: "fixed, directory",
            }),
        }
    }
}

/// How the scratch repository is addressed when pushing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// The repository's HTTPS clone URL, with the credential token embedded.
    #[default]
    Https,

    /// The repository's SSH URL, relying on the caller's SSH identity.
    Ssh,
}

impl Transport {
    const CONFIG_KEY: &'static str = "shifter.transport";
}

impl FromStr for Transport {
    type Err = InvalidConfigValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "https" => Ok(Transport::Https),
            "ssh" => Ok(Transport::Ssh),
            other => Err(InvalidConfigValue {
                key: Self::CONFIG_KEY,
                value: other.to_owned(),
                expected: "https, ssh",
            }),
        }
    }
}

/// Get the configured scratch repository naming scheme.
#[instrument]
pub fn get_scratch_repo_naming(repo: &Repo) -> eyre::Result<ScratchRepoNaming> {
    let config = repo.get_readonly_config()?;
    let value: Option<String> = config.get(ScratchRepoNaming::CONFIG_KEY)?;
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(Default::default()),
    }
}

/// Get the fixed scratch repository name, used with
/// [`ScratchRepoNaming::Fixed`].
#[instrument]
pub fn get_scratch_repo_name(repo: &Repo) -> eyre::Result<String> {
    let config = repo.get_readonly_config()?;
    config.get_or_else("shifter.scratchRepoName", || {
        DEFAULT_SCRATCH_REPO_NAME.to_owned()
    })
}

/// Get the configured transport for pushing to the scratch repository.
#[instrument]
pub fn get_transport(repo: &Repo) -> eyre::Result<Transport> {
    let config = repo.get_readonly_config()?;
    let value: Option<String> = config.get(Transport::CONFIG_KEY)?;
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(Default::default()),
    }
}

/// Environment variables which affect the functioning of `shifter`.
pub mod env_vars {
    use std::path::PathBuf;

    use tracing::instrument;

    /// Path to the Git executable to shell out to as a subprocess when
    /// appropriate. This may be set during tests.
    pub const TEST_GIT: &str = "TEST_GIT";

    /// Get the path to the Git executable for testing. Falls back to `git`
    /// on `PATH` if [`TEST_GIT`] is not set.
    #[instrument]
    pub fn get_path_to_git() -> eyre::Result<PathBuf> {
        match std::env::var_os(TEST_GIT) {
            Some(path_to_git) if !path_to_git.is_empty() => Ok(PathBuf::from(path_to_git)),
            _ => crate::util::get_from_path("git").ok_or_else(|| {
                eyre::eyre!(
                    "No path to Git executable was set and none was found on PATH. \
Try running as: `{0}=$(which git) cargo test ...`",
                    TEST_GIT,
                )
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scratch_repo_naming() {
        assert_eq!(
            "fixed".parse::<ScratchRepoNaming>().unwrap(),
            ScratchRepoNaming::Fixed
        );
        assert_eq!(
            "directory".parse::<ScratchRepoNaming>().unwrap(),
            ScratchRepoNaming::Directory
        );
        let err = "random".parse::<ScratchRepoNaming>().unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid value "random" for config key shifter.scratchRepoNaming, expected one of: fixed, directory"#
        );
    }

    #[test]
    fn test_parse_transport() {
        assert_eq!("https".parse::<Transport>().unwrap(), Transport::Https);
        assert_eq!("ssh".parse::<Transport>().unwrap(), Transport::Ssh);
        assert!("git".parse::<Transport>().is_err());
    }

    #[test]
    fn test_token_path_in_dir() {
        assert_eq!(
            get_token_path_in(Path::new("/opt/shifter")),
            PathBuf::from("/opt/shifter/.github_token")
        );
    }
}
