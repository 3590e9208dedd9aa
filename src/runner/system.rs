use super::{CommandLine, CommandOutput, Executor};
use crate::error::{ReimageError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Executor backed by real processes.
///
/// Stdin is closed so a tool that would stop to ask a question fails
/// instead of waiting on a terminal nobody is watching.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&self, command: &CommandLine) -> Result<CommandOutput> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.raw_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd
            .output()
            .map_err(|e| ReimageError::SystemCommandFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            code: output.status.code(),
            output: text,
        })
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_stderr() {
        let command = CommandLine::new("sh").arg("-c").arg("echo out; echo err 1>&2; exit 3");
        let result = SystemExecutor.execute(&command).expect("sh should spawn");
        assert_eq!(result.code, Some(3));
        assert!(result.output.contains("out"));
        assert!(result.output.contains("err"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let command = CommandLine::new("/definitely/not/here/reimage-test");
        let err = SystemExecutor.execute(&command).expect_err("spawn must fail");
        assert!(matches!(err, ReimageError::SystemCommandFailed { .. }));
    }
}
