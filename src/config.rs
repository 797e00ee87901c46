use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::CliArgs;
use crate::error::CleanupError;

pub const DEFAULT_PATH: &str = "backend/.env";
pub const DEFAULT_BACKUP_BRANCH: &str = "backup-before-cleanup";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";
pub const FILTER_TOOL: &str = "git-filter-repo";
pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    /// Paths stripped from every commit
    pub paths: Vec<String>,
    pub backup_branch: String,
    pub remote: String,
    pub branch: String,
    pub filter_tool: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            paths: vec![DEFAULT_PATH.to_string()],
            backup_branch: DEFAULT_BACKUP_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            filter_tool: FILTER_TOOL.to_string(),
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gitscrub")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("gitscrub.toml"))
}

impl Config {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Rejects settings that would turn the rewrite into a no-op or a malformed command.
    pub fn validate(&self) -> std::result::Result<(), CleanupError> {
        let invalid = |reason: String| -> std::result::Result<(), CleanupError> {
            Err(CleanupError::InvalidConfig { reason })
        };

        if self.version != CONFIG_VERSION {
            return invalid(format!(
                "unsupported config version {} (expected {CONFIG_VERSION})",
                self.version
            ));
        }
        if self.paths.is_empty() {
            return invalid("no paths to remove".to_string());
        }
        if self.paths.iter().any(|p| p.trim().is_empty()) {
            return invalid("empty entry in paths".to_string());
        }
        for (field, value) in [
            ("backup_branch", &self.backup_branch),
            ("remote", &self.remote),
            ("branch", &self.branch),
            ("filter_tool", &self.filter_tool),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("{field} must not be empty"));
            }
        }
        Ok(())
    }

    pub fn from_cli_and_file(cli_args: CliArgs) -> Result<Self> {
        let mut config = Self::load(cli_args.config)?;

        // CLI args override config file
        if !cli_args.paths.is_empty() {
            config.paths = cli_args.paths;
        }
        if let Some(backup_branch) = cli_args.backup_branch {
            config.backup_branch = backup_branch;
        }
        if let Some(remote) = cli_args.remote {
            config.remote = remote;
        }
        if let Some(branch) = cli_args.branch {
            config.branch = branch;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.paths, vec!["backend/.env"]);
        assert_eq!(config.backup_branch, "backup-before-cleanup");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.branch, "main");
        assert_eq!(config.filter_tool, "git-filter-repo");
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults_without_writing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(config_path.clone()))?;

        assert_eq!(config, Config::default());
        assert!(!config_path.exists());
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("gitscrub.toml");

        let config = Config {
            paths: vec!["secrets.json".to_string(), "api/.env".to_string()],
            remote: "upstream".to_string(),
            ..Config::default()
        };

        config.save(&config_path)?;
        let loaded = Config::load(Some(config_path))?;

        assert_eq!(config, loaded);
        Ok(())
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("gitscrub.toml");
        fs::write(&config_path, "branch = \"master\"\n")?;

        let config = Config::load(Some(config_path))?;

        assert_eq!(config.branch, "master");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.backup_branch, "backup-before-cleanup");
        Ok(())
    }

    #[test]
    fn test_config_invalid_toml_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("gitscrub.toml");
        fs::write(&config_path, "paths = not-a-list")?;

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }

    #[test]
    fn test_cli_override() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("gitscrub.toml");

        let file_config = Config {
            remote: "from-file".to_string(),
            branch: "from-file".to_string(),
            ..Config::default()
        };
        file_config.save(&config_path)?;

        let cli_args = CliArgs {
            config: Some(config_path),
            paths: vec!["creds.txt".to_string()],
            branch: Some("trunk".to_string()),
            ..CliArgs::default()
        };

        let config = Config::from_cli_and_file(cli_args)?;
        assert_eq!(config.paths, vec!["creds.txt"]);
        assert_eq!(config.branch, "trunk");
        // Not overridden on the command line
        assert_eq!(config.remote, "from-file");
        Ok(())
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_paths() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("gitscrub.toml");
        fs::write(&config_path, "paths = []\n")?;

        let config = Config::load(Some(config_path))?;
        let err = config.validate().unwrap_err();

        assert!(matches!(err, CleanupError::InvalidConfig { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("no paths to remove"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_blank_path_from_cli() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let cli_args = CliArgs {
            config: Some(temp_dir.path().join("missing.toml")),
            paths: vec!["backend/.env".to_string(), "  ".to_string()],
            ..CliArgs::default()
        };

        let config = Config::from_cli_and_file(cli_args)?;
        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("empty entry in paths"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_unknown_version_and_blank_remote() {
        let future = Config {
            version: 2,
            ..Config::default()
        };
        let err = future.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported config version 2"));

        let no_remote = Config {
            remote: String::new(),
            ..Config::default()
        };
        let err = no_remote.validate().unwrap_err();
        assert!(err.to_string().contains("remote must not be empty"));
    }

    #[test]
    fn test_get_default_config_path() -> Result<()> {
        let path = get_default_config_path()?;
        assert!(path.ends_with("gitscrub.toml"));
        Ok(())
    }
}
