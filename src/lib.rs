//! gitscrub library
//!
//! Purges paths from git history by driving `git` and `git-filter-repo` as
//! subprocesses: preflight checks, a backup branch, the rewrite, then a force
//! push. Exposed as a library so the steps can be tested without a terminal.

pub mod app;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod preflight;
pub mod runner;

pub use error::{CleanupError, Result};
