//! External tool invocation (`msgcat`, `geo2topo`)

use std::io::Write as _;
use std::process::{
    Command,
    Stdio,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write the standard input of '{program}': {source}")]
    Stdin {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

pub trait CommandRunner {
    /// Run `program` to completion, optionally feeding `stdin`.
    ///
    /// A nonzero exit is reported through [`CommandOutput::status`]; only a
    /// failure to start or talk to the process is an error.
    fn run(&self, program: &str, args: &[String], stdin: Option<&[u8]>)
    -> Result<CommandOutput, CommandError>;
}

/// [`CommandRunner`] spawning real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, CommandError> {
        tracing::debug!("Running {program} {}", args.join(" "));

        let spawn_error = |source| CommandError::Spawn { program: program.to_string(), source };
        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // stdin is closed when `pipe` drops
            pipe.write_all(input)
                .map_err(|source| CommandError::Stdin { program: program.to_string(), source })?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_missing_program_is_spawn_error() {
        let result = SystemCommandRunner.run("relay-l10n-no-such-tool", &[], None);

        expect_that!(matches!(result, Err(CommandError::Spawn { .. })), eq(true));
    }

    #[cfg(unix)]
    #[googletest::test]
    fn test_stdin_is_piped_and_output_captured() {
        let output = SystemCommandRunner.run("cat", &[], Some(b"geometry")).unwrap();

        expect_that!(output.success(), eq(true));
        expect_that!(output.stdout, eq("geometry"));
    }

    #[cfg(unix)]
    #[googletest::test]
    fn test_nonzero_exit_is_not_an_error() {
        let output = SystemCommandRunner.run("false", &[], None).unwrap();

        expect_that!(output.success(), eq(false));
        expect_that!(output.status, some(eq(1)));
    }
}
