use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::cleanup::HistoryCleanup;
use crate::cli::CliArgs;
use crate::config::Config;
use crate::error::{CleanupError, EXIT_FAILURE, EXIT_OK};
use crate::preflight;
use crate::runner::CommandRunner;

/// Preflight, cleanup and the closing summary. Returns the process exit code.
///
/// The repository check runs before the config is read, so running outside a
/// repository is reported as such even when the config file is broken.
pub fn run<R, W>(
    workdir: &Path,
    cli_args: CliArgs,
    path_var: Option<&OsStr>,
    runner: &R,
    out: &mut W,
) -> i32
where
    R: CommandRunner,
    W: Write,
{
    match execute(workdir, cli_args, path_var, runner, out) {
        Ok(code) => code,
        Err(e) => {
            // Only output failures end up here
            error!("Application error: {}", e);
            e.exit_code()
        }
    }
}

fn execute<R, W>(
    workdir: &Path,
    cli_args: CliArgs,
    path_var: Option<&OsStr>,
    runner: &R,
    out: &mut W,
) -> Result<i32, CleanupError>
where
    R: CommandRunner,
    W: Write,
{
    if let Err(e) = preflight::require_repository(workdir) {
        return report_startup_failure(e, out);
    }

    let config = match load_config(cli_args) {
        Ok(config) => config,
        Err(e) => return report_startup_failure(e, out),
    };

    let filter_program = match preflight::require_tool(&config.filter_tool, path_var) {
        Ok(path) => path,
        Err(e) => return report_startup_failure(e, out),
    };

    match HistoryCleanup::new(runner, &config, &filter_program).run(out) {
        Ok(report) => {
            info!(backup_created = report.backup_created, "cleanup finished");
            writeln!(out, "\n🎉 Git history cleaned successfully!")?;
            writeln!(
                out,
                "If you need to restore, use: git checkout {}",
                config.backup_branch
            )?;
            Ok(EXIT_OK)
        }
        Err(CleanupError::Io(e)) => Err(CleanupError::Io(e)),
        Err(e) => {
            error!("cleanup failed: {}", e);
            writeln!(out, "\n❌ Failed to clean git history")?;
            Ok(EXIT_FAILURE)
        }
    }
}

fn load_config(cli_args: CliArgs) -> Result<Config, CleanupError> {
    let config =
        Config::from_cli_and_file(cli_args).map_err(|source| CleanupError::Config { source })?;
    config.validate()?;
    Ok(config)
}

fn report_startup_failure<W: Write>(
    err: CleanupError,
    out: &mut W,
) -> Result<i32, CleanupError> {
    error!("startup check failed: {:#}", err);
    writeln!(out, "Error: {err}")?;
    if let CleanupError::ToolNotFound { tool } = &err {
        writeln!(out, "You can install it with: pip3 install {tool}")?;
    }
    Ok(err.exit_code())
}
