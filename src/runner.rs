//! Subprocess execution behind a small port.
//!
//! [`CommandRunner`] decouples the cleanup steps from actually spawning
//! processes. Every invocation yields a [`CommandOutcome`]; spawn failures and
//! non-zero exits are folded into `success == false` rather than surfaced as
//! errors, so each step decides for itself whether to continue.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, instrument, warn};

/// Captured result of one external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Port for running external commands
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit. Never fails.
    fn run(&self, program: &OsStr, args: &[&str]) -> CommandOutcome;
}

/// Runs commands as child processes in a fixed working directory
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    workdir: PathBuf,
}

impl ProcessRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(
        skip_all,
        fields(program = %program.to_string_lossy(), workdir = %self.workdir.display())
    )]
    fn run(&self, program: &OsStr, args: &[&str]) -> CommandOutcome {
        debug!(?args, "spawning command");

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                let outcome = CommandOutcome {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                };
                if !outcome.success {
                    warn!(exit_code = ?output.status.code(), "command failed");
                }
                outcome
            }
            Err(e) => {
                warn!(err = %e, "failed to spawn command");
                CommandOutcome::failed(format!("failed to run {}: {e}", program.to_string_lossy()))
            }
        }
    }
}
