//! Utility functions.

use std::num::TryFromIntError;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Represents the code to exit the process with.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExitCode(pub isize);

impl ExitCode {
    /// Return an exit code corresponding to success.
    pub fn success() -> Self {
        Self(0)
    }

    /// Determine whether or not this exit code represents a successful
    /// termination.
    pub fn is_success(&self) -> bool {
        match self {
            ExitCode(0) => true,
            ExitCode(_) => false,
        }
    }
}

impl TryFrom<ExitStatus> for ExitCode {
    type Error = TryFromIntError;

    fn try_from(status: ExitStatus) -> Result<Self, Self::Error> {
        // On Unix, if the child process was terminated by a signal, we need to
        // call some Unix-specific functions to access the signal that
        // terminated it. For simplicity, just return `1` in those cases.
        let exit_code = status.code().unwrap_or(1);
        Ok(Self(exit_code.try_into()?))
    }
}

/// Encapsulate both an `eyre::Error` and an `ExitCode`. The `eyre::Error`
/// represents an unexpected failure, while the `ExitCode` represents a failure
/// which has already been reported to the user.
pub type EyreExitOr<T> = eyre::Result<Result<T, ExitCode>>;

/// Helper macro to return early from a function returning `EyreExitOr<T>` if
/// the provided expression evaluates to an `Err(ExitCode)`.
#[macro_export]
macro_rules! try_exit_code {
    ($e:expr) => {
        match $e {
            Ok(value) => value,
            Err(exit_code) => {
                return Ok(Err(exit_code));
            }
        }
    };
}

/// Returns a path for a given file, searching through PATH to find it.
pub fn get_from_path(exe_name: &str) -> Option<PathBuf> {
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths).find_map(|dir| {
            let exe_path = dir.join(exe_name);
            if exe_path.is_file() {
                Some(exe_path)
            } else {
                None
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_success() {
        assert!(ExitCode::success().is_success());
        assert!(!ExitCode(1).is_success());
        assert!(!ExitCode(-1).is_success());
    }

    fn returns_early(code: Result<(), ExitCode>) -> EyreExitOr<&'static str> {
        try_exit_code!(code);
        Ok(Ok("finished"))
    }

    #[test]
    fn test_try_exit_code() -> eyre::Result<()> {
        assert_eq!(returns_early(Ok(()))?, Ok("finished"));
        assert_eq!(returns_early(Err(ExitCode(3)))?, Err(ExitCode(3)));
        Ok(())
    }
}
