//! Plain-text console progress.
//!
//! Progress lines are the program's user-facing output and are separate
//! from `tracing` diagnostics. Lines are built in two halves
//! (`Downloading <url>...` then `done`), so every partial write is flushed.

use std::fmt::Display;
use std::io::Write;

use tracing::trace;

/// Writes progress lines to any [`Write`] sink (stdout in the binary).
///
/// Console write failures are not download failures; they are logged at
/// trace level and otherwise ignored.
#[derive(Debug)]
pub struct Progress<W: Write> {
    out: W,
}

impl<W: Write> Progress<W> {
    /// Wraps a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes `text` without a trailing newline and flushes.
    pub fn partial(&mut self, text: impl Display) {
        let result = write!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            trace!(error = %e, "failed to write progress");
        }
    }

    /// Writes `text` followed by a newline.
    pub fn line(&mut self, text: impl Display) {
        let result = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            trace!(error = %e, "failed to write progress");
        }
    }

    /// Unwraps the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_then_line_forms_one_line() {
        let mut progress = Progress::new(Vec::new());
        progress.partial("Downloading http://x.test/a.jpg...");
        progress.line("done");
        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(text, "Downloading http://x.test/a.jpg...done\n");
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut progress = Progress::new(Broken);
        progress.partial("ignored");
        progress.line("ignored");
    }
}
