use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq, Default)]
#[command(name = "gitscrub")]
#[command(about = "Purge a sensitive file from git history and force-push the result")]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to remove from every commit (repeatable, overrides config)
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Branch created before the rewrite
    #[arg(long)]
    pub backup_branch: Option<String>,

    /// Remote to force-push to
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to force-push
    #[arg(long)]
    pub branch: Option<String>,
}
