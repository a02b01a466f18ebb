//! Operator-facing terminal output.
//!
//! Command echoes and tool output are plain lines so they can be copied and
//! re-run. Status lines (sections, ✓/✗, warnings) are colored when the
//! stream is a terminal. Diagnostic detail goes through `log`.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Output manager for colored terminal output.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `quiet` suppresses progress and success lines; command echoes, tool
    /// output, warnings and errors are always shown. Colors are used only
    /// for streams attached to a terminal.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            stdout_color: color_choice(io::stdout().is_terminal()),
            stderr_color: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Print the command line about to run.
    pub fn command(&self, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{line}")
    }

    /// Print a command line tagged with the variant it builds.
    pub fn tagged_command(&self, tag: &str, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "[{tag}] {line}")
    }

    /// Re-emit one line of a child's stdout.
    pub fn tool_stdout(&self, tag: &str, line: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "[{tag}] {line}")
    }

    /// Re-emit one line of a child's stderr.
    pub fn tool_stderr(&self, tag: &str, line: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "[{tag}] {line}")
    }

    /// Print detail shown only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose && !self.quiet {
            let stdout = self.stdout();
            let mut out = stdout.lock();
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "  {message}")?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            let stdout = self.stdout();
            let mut out = stdout.lock();
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
            write!(out, "{message}")?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if !self.quiet {
            let stdout = self.stdout();
            let mut out = stdout.lock();
            writeln!(out)?;
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "== {title} ==")?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            writeln!(self.stdout().lock(), "    {message}")?;
        }
        Ok(())
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if !self.quiet {
            styled_line(&self.stdout(), Color::Green, "✓ ", message)?;
        }
        Ok(())
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        styled_line(&self.stderr(), Color::Yellow, "warning: ", message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        styled_line(&self.stderr(), Color::Red, "✗ ", message)
    }

    fn stdout(&self) -> StandardStream {
        StandardStream::stdout(self.stdout_color)
    }

    fn stderr(&self) -> StandardStream {
        StandardStream::stderr(self.stderr_color)
    }
}

/// Best-effort terminal writes: a failed write is logged, never propagated.
pub trait WriteResultExt {
    fn log_failure(self);
}

impl WriteResultExt for io::Result<()> {
    fn log_failure(self) {
        if let Err(e) = self {
            log::debug!("Terminal write failed: {e}");
        }
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Writes `prefix` in bold `color`, then `message` in the default style.
fn styled_line(stream: &StandardStream, color: Color, prefix: &str, message: &str) -> io::Result<()> {
    let mut out = stream.lock();
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{prefix}")?;
    out.reset()?;
    writeln!(out, "{message}")
}
