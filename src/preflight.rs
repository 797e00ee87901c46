use git2::Repository as GitRepository;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CleanupError, Result};

/// True when `dir` is the top of a non-bare git working tree.
///
/// Parent directories are not searched.
pub fn is_git_repository<P: AsRef<Path>>(dir: P) -> bool {
    match GitRepository::open(dir.as_ref()) {
        Ok(repo) => !repo.is_bare(),
        Err(e) => {
            debug!(dir = %dir.as_ref().display(), err = %e, "not a git repository");
            false
        }
    }
}

/// Finds an executable named `name` in a `PATH`-style list of directories.
pub fn locate_tool(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Fails unless `dir` is a git working tree.
pub fn require_repository<P: AsRef<Path>>(dir: P) -> Result<()> {
    if !is_git_repository(&dir) {
        return Err(CleanupError::NotAGitRepository);
    }
    Ok(())
}

/// Resolves the filter tool to the executable that will actually be run.
pub fn require_tool(tool: &str, path_var: Option<&OsStr>) -> Result<PathBuf> {
    let resolved = locate_tool(tool, path_var).ok_or_else(|| CleanupError::ToolNotFound {
        tool: tool.to_string(),
    })?;

    info!(tool = %resolved.display(), "found filter tool");
    Ok(resolved)
}
