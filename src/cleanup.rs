use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::error::{CleanupError, Result};
use crate::runner::CommandRunner;

/// What happened during a successful cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// False when `git branch` refused to create the backup branch
    pub backup_created: bool,
}

/// Backup, rewrite, push. Stops at the first fatal step.
pub struct HistoryCleanup<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a Config,
    filter_program: &'a Path,
}

impl<'a, R: CommandRunner> HistoryCleanup<'a, R> {
    /// `filter_program` is the executable preflight resolved for `config.filter_tool`.
    pub fn new(runner: &'a R, config: &'a Config, filter_program: &'a Path) -> Self {
        Self {
            runner,
            config,
            filter_program,
        }
    }

    #[instrument(skip_all, fields(paths = ?self.config.paths))]
    pub fn run<W: Write>(&self, out: &mut W) -> Result<CleanupReport> {
        self.config.validate()?;
        writeln!(out, "Cleaning git history to remove secrets...")?;

        let backup_created = self.create_backup(out)?;
        self.rewrite_history(out)?;
        self.force_push(out)?;

        Ok(CleanupReport { backup_created })
    }

    fn create_backup<W: Write>(&self, out: &mut W) -> Result<bool> {
        let branch = &self.config.backup_branch;
        let outcome = self.runner.run(OsStr::new("git"), &["branch", branch.as_str()]);

        if outcome.success {
            info!(%branch, "created backup branch");
            writeln!(out, "✓ Created backup branch: {branch}")?;
        } else {
            warn!(%branch, stderr = %outcome.stderr.trim(), "could not create backup branch");
            writeln!(out, "⚠ Warning: Could not create backup branch")?;
        }
        Ok(outcome.success)
    }

    fn rewrite_history<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "Running {} to remove {} from history...",
            self.config.filter_tool,
            self.config.paths.join(", ")
        )?;

        let args = filter_args(&self.config.paths);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let outcome = self.runner.run(self.filter_program.as_os_str(), &args);

        if !outcome.success {
            error!(stderr = %outcome.stderr.trim(), "history rewrite failed");
            writeln!(out, "✗ Failed to clean git history:")?;
            writeln!(out, "{}", outcome.stderr)?;
            return Err(CleanupError::RewriteFailed {
                stderr: outcome.stderr,
            });
        }

        info!("history rewritten");
        writeln!(out, "✓ Successfully cleaned git history")?;
        Ok(())
    }

    fn force_push<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Force pushing to remote...")?;

        let outcome = self.runner.run(
            OsStr::new("git"),
            &[
                "push",
                self.config.remote.as_str(),
                self.config.branch.as_str(),
                "--force",
            ],
        );

        if !outcome.success {
            error!(
                remote = %self.config.remote,
                branch = %self.config.branch,
                stderr = %outcome.stderr.trim(),
                "force push failed"
            );
            writeln!(out, "✗ Failed to push to remote:")?;
            writeln!(out, "{}", outcome.stderr)?;
            return Err(CleanupError::PushFailed {
                stderr: outcome.stderr,
            });
        }

        info!(
            remote = %self.config.remote,
            branch = %self.config.branch,
            "pushed rewritten history"
        );
        writeln!(out, "✓ Successfully pushed cleaned history to remote")?;
        Ok(())
    }
}

/// `--path <p>` per target, then drop everything matched and overwrite in place.
pub fn filter_args(paths: &[String]) -> Vec<String> {
    let mut args = Vec::with_capacity(paths.len() * 2 + 2);
    for path in paths {
        args.push("--path".to_string());
        args.push(path.clone());
    }
    args.push("--invert-paths".to_string());
    args.push("--force".to_string());
    args
}
