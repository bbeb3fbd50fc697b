//! Establishing an authenticated session with the hosted API.

use std::fmt::Write;
use std::path::Path;

use tracing::{info, instrument};

use crate::core::credentials::{get_token_guidance, load_token, Token};
use crate::core::effects::Effects;
use crate::github::GithubApi;
use crate::util::{ExitCode, EyreExitOr};

/// The context shared by every step after authentication.
#[derive(Debug)]
pub struct Session<C> {
    /// The credential token the session was established with.
    pub token: Token,

    /// The login of the authenticated user, who owns the scratch repository.
    pub owner: String,

    /// The API client, authenticated as `owner`.
    pub github: C,
}

/// Load the credential token from `token_path`, construct an API client with
/// `connect`, and resolve the authenticated user.
///
/// If the token cannot be loaded, instructions for creating one are printed
/// and `connect` is never called. If the hosted API rejects the token, the
/// error is printed.
#[instrument(skip(connect))]
pub fn authenticate<C: GithubApi>(
    effects: &Effects,
    token_path: &Path,
    connect: impl FnOnce(&Token) -> eyre::Result<C>,
) -> EyreExitOr<Session<C>> {
    let token = match load_token(token_path) {
        Ok(token) => token,
        Err(err) => {
            info!(%err, "Could not load token");
            writeln!(
                effects.get_output_stream(),
                "{}",
                get_token_guidance(err.get_path())
            )?;
            return Ok(Err(ExitCode(1)));
        }
    };

    let github = connect(&token)?;
    let user = match github.get_current_user() {
        Ok(user) => user,
        Err(err) => {
            info!(%err, "Authentication failed");
            writeln!(
                effects.get_error_stream(),
                "Could not authenticate with GitHub: {err}"
            )?;
            return Ok(Err(ExitCode(1)));
        }
    };
    info!(login = %user.login, "Authenticated");

    Ok(Ok(Session {
        token,
        owner: user.login,
        github,
    }))
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::formatting::Glyphs;
    use crate::github::testing::{MockCall, MockGithubClient};
    use crate::testing::collect_warnings;

    fn make_effects() -> (Effects, Arc<Mutex<Vec<u8>>>, Arc<Mutex<Vec<u8>>>) {
        let stdout = Arc::new(Mutex::new(Vec::new()));
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let effects = Effects::new_from_buffer_for_test(Glyphs::text(), &stdout, &stderr);
        (effects, stdout, stderr)
    }

    #[test]
    fn test_missing_token_never_connects() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let token_path = dir.path().join(".github_token");
        let (effects, stdout, _stderr) = make_effects();
        let connected = Cell::new(false);

        let result = authenticate(&effects, &token_path, |_token| {
            connected.set(true);
            Ok(MockGithubClient::new("octocat", dir.path()))
        })?;
        assert_eq!(result.unwrap_err(), ExitCode(1));
        assert!(!connected.get());

        let stdout = String::from_utf8(stdout.lock().unwrap().clone())?;
        assert!(stdout.starts_with("Go to https://github.com/settings/tokens"));
        assert!(stdout.trim_end().ends_with(&token_path.display().to_string()));
        Ok(())
    }

    #[test]
    fn test_authenticate_resolves_owner() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let token_path = dir.path().join(".github_token");
        std::fs::write(&token_path, "ghp_secret\n")?;
        let (effects, _stdout, _stderr) = make_effects();

        let session = authenticate(&effects, &token_path, |token| {
            assert_eq!(token.expose(), "ghp_secret");
            Ok(MockGithubClient::new("octocat", dir.path()))
        })?
        .unwrap();
        assert_eq!(session.owner, "octocat");
        assert_eq!(session.github.get_calls(), vec![MockCall::GetCurrentUser]);
        Ok(())
    }

    #[test]
    fn test_rejected_token_is_reported() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let token_path = dir.path().join(".github_token");
        std::fs::write(&token_path, "ghp_revoked")?;
        let (effects, _stdout, stderr) = make_effects();

        let (result, warnings) = collect_warnings(|| {
            authenticate(&effects, &token_path, |_token| {
                let github = MockGithubClient::new("octocat", dir.path());
                github.reject_credentials();
                Ok(github)
            })
        });
        assert_eq!(result?.unwrap_err(), ExitCode(1));
        insta::assert_snapshot!(warnings, @"");

        let stderr = String::from_utf8(stderr.lock().unwrap().clone())?;
        insta::assert_snapshot!(stderr.trim_end(), @"Could not authenticate with GitHub: bad credentials: Bad credentials");
        Ok(())
    }
}
