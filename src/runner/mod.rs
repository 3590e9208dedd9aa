//! External command execution
//!
//! Every process this tool starts goes through [`Runner`], which applies the
//! dry-run gate to mutating commands and logs the outcome. The process world
//! itself sits behind the [`Executor`] trait so tests can record invocations
//! instead of spawning anything.

mod system;

pub use system::SystemExecutor;

use crate::error::{ReimageError, Result, exit_code_label};
use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder rendered in place of secret arguments.
const MASK: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Plain(String),
    /// Secret value; `prefix` stays visible in logs (e.g. `-p`)
    Secret { prefix: String, value: String },
}

/// Program plus arguments, with secrets kept out of its `Display` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<Arg>,
}

impl CommandLine {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_string_lossy().into_owned(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<std::ffi::OsStr>) -> Self {
        self.args
            .push(Arg::Plain(arg.as_ref().to_string_lossy().into_owned()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Append `prefix` immediately followed by `value` as one argument.
    pub fn secret(mut self, prefix: &str, value: &str) -> Self {
        self.args.push(Arg::Secret {
            prefix: prefix.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Short program name used in error messages (`7z` rather than the full path).
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.clone())
    }

    /// Arguments exactly as they are handed to the process.
    pub fn raw_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Plain(s) => s.clone(),
                Arg::Secret { prefix, value } => format!("{}{}", prefix, value),
            })
            .collect()
    }

    fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Plain(s) => s.clone(),
                Arg::Secret { prefix, .. } => format!("{}{}", prefix, MASK),
            })
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = vec![self.program.clone()];
        words.extend(self.display_args());
        match shlex::try_join(words.iter().map(String::as_str)) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => f.write_str(&words.join(" ")),
        }
    }
}

/// Result of a finished process: exit code plus stdout and stderr as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub output: String,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            output: output.into(),
        }
    }

    pub fn failure(code: i32, output: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Access to the processes of the host system
pub trait Executor {
    /// Run to completion, capturing combined output. Only spawn failures are errors.
    fn execute(&self, command: &CommandLine) -> Result<CommandOutput>;

    /// Look a program up on the search path.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Whether a command changes state outside the archive being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ReadOnly,
    Destructive,
}

pub struct Runner<'a> {
    executor: &'a dyn Executor,
    dry_run: bool,
}

impl<'a> Runner<'a> {
    pub fn new(executor: &'a dyn Executor, dry_run: bool) -> Self {
        Self { executor, dry_run }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.executor.resolve(program)
    }

    /// Run a command and return its output.
    ///
    /// A non-zero exit is logged and otherwise ignored. Destructive commands
    /// are only logged under dry-run, yielding empty output.
    pub fn run(&self, command: &CommandLine, effect: Effect) -> Result<String> {
        let Some(result) = self.execute(command, effect)? else {
            return Ok(String::new());
        };

        if !result.is_success() {
            tracing::error!(
                "{} returned an error: {}\n{}",
                command.program_name(),
                exit_code_label(&result.code),
                result.output
            );
        }

        Ok(result.output)
    }

    /// Like [`Runner::run`], but a non-zero exit becomes [`ReimageError::CommandExit`].
    pub fn run_checked(&self, command: &CommandLine, effect: Effect) -> Result<String> {
        let Some(result) = self.execute(command, effect)? else {
            return Ok(String::new());
        };

        if result.is_success() {
            Ok(result.output)
        } else {
            Err(ReimageError::CommandExit {
                program: command.program_name(),
                code: result.code,
                output: result.output,
            })
        }
    }

    fn execute(&self, command: &CommandLine, effect: Effect) -> Result<Option<CommandOutput>> {
        if effect == Effect::Destructive && self.dry_run {
            tracing::info!("Dry run: {}", command);
            return Ok(None);
        }

        tracing::debug!("Calling: {}", command);
        let result = self.executor.execute(command)?;
        tracing::debug!("Returned:\n{}", result.output);
        Ok(Some(result))
    }
}
