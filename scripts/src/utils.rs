//! Utilities for the deploy scripts.

use std::{
    fmt::{self, Display, Formatter},
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::info;

use crate::errors::ScriptError;

/// An external program invocation, with a fixed argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    /// The binary to run
    pub program: String,
    /// Arguments passed to the binary
    pub args: Vec<String>,
    /// Working directory of the child process
    pub cwd: PathBuf,
}

impl ExternalCommand {
    /// Build a command from a program and a whitespace separated argument string
    pub fn new(program: &str, args: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: args.split_whitespace().map(String::from).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Std command with inherited standard io
    fn to_process_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl Display for ExternalCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Something able to run external commands to completion
pub trait CommandRunner: Send + Sync {
    /// Run the command, returning whether it exited successfully
    fn run(&self, cmd: &ExternalCommand) -> io::Result<bool>;
}

/// Runs commands as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, cmd: &ExternalCommand) -> io::Result<bool> {
        let status = cmd.to_process_command().status()?;
        Ok(status.success())
    }
}

/// Executes a command, returning an error built with `on_error` if the command fails
pub fn command_success_or<R: CommandRunner + ?Sized>(
    runner: &R,
    cmd: &ExternalCommand,
    on_error: fn(String) -> ScriptError,
    err_msg: &str,
) -> Result<(), ScriptError> {
    info!(command = %cmd, cwd = ?cmd.cwd, "Running command");
    let success = runner
        .run(cmd)
        .map_err(|e| on_error(format!("{err_msg}: {e}")))?;

    if success {
        Ok(())
    } else {
        Err(on_error(String::from(err_msg)))
    }
}

/// Current unix time, in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
