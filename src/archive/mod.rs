//! Archive gateway
//!
//! Builds 7-Zip command lines against the one archive a run works with and
//! sends them through the [`Runner`].
//!
//! Adding to the archive is deliberately not gated by dry-run: a dry-run
//! backup still builds the archive, while extraction, which overwrites live
//! files, is gated like every other destructive command.

mod verify;

pub use verify::{MAX_PASSWORD_ATTEMPTS, Verifier};

use crate::error::Result;
use crate::runner::{CommandLine, Effect, Runner};
use std::fmt;
use std::path::{Path, PathBuf};

/// Archive password; empty when the archive is not encrypted
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_empty() { "Password(<empty>)" } else { "Password(***)" })
    }
}

pub struct Archive<'a> {
    tool: PathBuf,
    path: PathBuf,
    runner: &'a Runner<'a>,
}

impl<'a> Archive<'a> {
    pub fn new(tool: &Path, path: &Path, runner: &'a Runner<'a>) -> Self {
        Self {
            tool: tool.to_path_buf(),
            path: path.to_path_buf(),
            runner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `source` (full path preserved), skipping anything matched by `filters`.
    pub fn add(&self, source: &Path, filters: &[String], password: Option<&Password>) -> Result<()> {
        self.runner
            .run(&self.add_command(source, filters, password), Effect::ReadOnly)?;
        Ok(())
    }

    /// Extract `target` back to its original full path.
    pub fn extract(&self, target: &Path, password: Option<&Password>) -> Result<()> {
        self.runner
            .run(&self.extract_command(target, password), Effect::Destructive)?;
        Ok(())
    }

    /// Technical listing (`-slt`) of the archive contents.
    pub fn list(&self) -> Result<String> {
        self.runner.run(&self.list_command(), Effect::ReadOnly)
    }

    /// Integrity test; a non-zero exit is returned as an error.
    pub fn test(&self, password: &Password) -> Result<String> {
        self.runner
            .run_checked(&self.test_command(password), Effect::ReadOnly)
    }

    pub(crate) fn add_command(
        &self,
        source: &Path,
        filters: &[String],
        password: Option<&Password>,
    ) -> CommandLine {
        let command = CommandLine::new(&self.tool)
            .args(["a", "-spf"])
            .arg(&self.path)
            .arg(source)
            .args(filters);
        with_password(command, password)
    }

    pub(crate) fn extract_command(&self, target: &Path, password: Option<&Password>) -> CommandLine {
        let command = CommandLine::new(&self.tool)
            .args(["x", "-spf"])
            .arg(&self.path)
            .arg(target);
        with_password(command, password)
    }

    pub(crate) fn list_command(&self) -> CommandLine {
        CommandLine::new(&self.tool)
            .arg("l")
            .arg(&self.path)
            .arg("-slt")
    }

    /// Always carries `-p`, even when empty, so 7-Zip never stops to ask.
    pub(crate) fn test_command(&self, password: &Password) -> CommandLine {
        CommandLine::new(&self.tool)
            .arg("t")
            .arg(&self.path)
            .secret("-p", password.expose())
    }
}

fn with_password(command: CommandLine, password: Option<&Password>) -> CommandLine {
    match password {
        Some(password) if !password.is_empty() => command.secret("-p", password.expose()),
        _ => command,
    }
}
