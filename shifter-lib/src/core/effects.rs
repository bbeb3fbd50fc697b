//! Wrappers around various side effects.

use std::fmt::Write;
use std::io::{self, stderr, stdout, Write as WriteIo};
use std::sync::{Arc, Mutex};

use crate::core::formatting::Glyphs;

#[derive(Clone, Debug)]
enum OutputDest {
    Stdout,
    Suppress,
    BufferForTest {
        stdout: Arc<Mutex<Vec<u8>>>,
        stderr: Arc<Mutex<Vec<u8>>>,
    },
}

/// Wrapper around side-effectful operations, such as output.
///
/// All user-facing output goes through an `Effects` value so that tests can
/// capture it, and so that it can be silenced entirely.
#[derive(Clone)]
pub struct Effects {
    glyphs: Glyphs,
    dest: OutputDest,
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Output fancy={}>",
            self.glyphs.should_write_ansi_escape_codes
        )
    }
}

impl Effects {
    /// Constructor. Writes to stdout.
    pub fn new(glyphs: Glyphs) -> Self {
        Effects {
            glyphs,
            dest: OutputDest::Stdout,
        }
    }

    /// Constructor. Writes to the provided buffer.
    pub fn new_from_buffer_for_test(
        glyphs: Glyphs,
        stdout: &Arc<Mutex<Vec<u8>>>,
        stderr: &Arc<Mutex<Vec<u8>>>,
    ) -> Self {
        Effects {
            glyphs,
            dest: OutputDest::BufferForTest {
                stdout: Arc::clone(stdout),
                stderr: Arc::clone(stderr),
            },
        }
    }

    /// Suppress output sent to the returned `Effects`.
    pub fn suppress(&self) -> Self {
        Self {
            dest: OutputDest::Suppress,
            ..self.clone()
        }
    }

    /// Get the set of glyphs associated with the output.
    pub fn get_glyphs(&self) -> &Glyphs {
        &self.glyphs
    }

    /// Create a stream that can be written to.
    pub fn get_output_stream(&self) -> OutputStream {
        OutputStream {
            dest: self.dest.clone(),
        }
    }

    /// Create a stream that error output can be written to, rather than regular
    /// output.
    pub fn get_error_stream(&self) -> ErrorStream {
        ErrorStream {
            dest: self.dest.clone(),
        }
    }
}

/// A handle to stdout.
pub struct OutputStream {
    dest: OutputDest,
}

impl Write for OutputStream {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        match &self.dest {
            OutputDest::Stdout => {
                let mut stdout = stdout().lock();
                write!(stdout, "{s}").map_err(|_| std::fmt::Error)?;
                stdout.flush().map_err(|_| std::fmt::Error)?;
            }

            OutputDest::Suppress => {
                // Do nothing.
            }

            OutputDest::BufferForTest { stdout, stderr: _ } => {
                let mut buffer = stdout.lock().unwrap();
                write!(buffer, "{s}").unwrap();
            }
        }
        Ok(())
    }
}

/// A handle to stderr.
pub struct ErrorStream {
    dest: OutputDest,
}

impl Write for ErrorStream {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        match &self.dest {
            OutputDest::Stdout => {
                let mut stderr = stderr().lock();
                write!(stderr, "{s}").map_err(|_| std::fmt::Error)?;
                stderr.flush().map_err(|_| std::fmt::Error)?;
            }

            OutputDest::Suppress => {
                // Do nothing.
            }

            OutputDest::BufferForTest { stdout: _, stderr } => {
                let mut buffer = stderr.lock().unwrap();
                write!(buffer, "{s}").unwrap();
            }
        }
        Ok(())
    }
}

/// You probably don't want this. This implementation is only for `tracing`'s `fmt_layer`, because
/// it needs a writer of type `io::Write`, but `Effects` normally uses its implementation of
/// `fmt::Write`.
impl io::Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &self.dest {
            OutputDest::Stdout => stderr().write(buf),
            OutputDest::Suppress => {
                // Do nothing.
                Ok(buf.len())
            }
            OutputDest::BufferForTest { stdout: _, stderr } => {
                let mut buffer = stderr.lock().unwrap();
                buffer.write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &self.dest {
            OutputDest::Stdout => stderr().flush(),
            OutputDest::Suppress | OutputDest::BufferForTest { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_for_test_separates_streams() -> eyre::Result<()> {
        let stdout = Arc::new(Mutex::new(Vec::new()));
        let stderr = Arc::new(Mutex::new(Vec::new()));
        let effects = Effects::new_from_buffer_for_test(Glyphs::text(), &stdout, &stderr);
        writeln!(effects.get_output_stream(), "to stdout")?;
        effects.get_error_stream().write_str("to stderr\n")?;
        writeln!(effects.suppress().get_output_stream(), "nowhere")?;

        let stdout = String::from_utf8(stdout.lock().unwrap().clone())?;
        let stderr = String::from_utf8(stderr.lock().unwrap().clone())?;
        assert_eq!(stdout, "to stdout\n");
        assert_eq!(stderr, "to stderr\n");
        Ok(())
    }
}
