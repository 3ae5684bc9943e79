use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

/// What the picker lets the user choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Template files, with an optional preview pane.
    File,
    /// Directories only; new directories may be created.
    Directory,
}

#[derive(Debug)]
pub struct RootError {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for RootError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "cannot browse {}: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for RootError {}

/// Application configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub mode: PickMode,
    pub show_preview: bool,
    pub previewer: Option<String>,
    pub max_preview_bytes: u64,
}

impl Config {
    /// Parse process arguments into a Config
    pub fn from_cli() -> Result<Self> {
        Self::from_parsed(Cli::parse())
    }

    /// Parse an explicit argument list; clap usage errors are returned, not printed.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_parsed(Cli::try_parse_from(args)?)
    }

    fn from_parsed(cli: Cli) -> Result<Self> {
        let root = match cli.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let root = resolve_root(&root)?;
        let mode = if cli.directory {
            PickMode::Directory
        } else {
            PickMode::File
        };
        Ok(Config {
            root,
            mode,
            show_preview: mode == PickMode::File && !cli.no_preview,
            previewer: cli.previewer.filter(|cmd| !cmd.trim().is_empty()),
            max_preview_bytes: cli.max_preview_bytes,
        })
    }
}

/// Canonicalizes `root` and checks that it is a directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let canon = dunce::canonicalize(root).map_err(|e| RootError {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !canon.is_dir() {
        return Err(RootError {
            path: root.to_path_buf(),
            reason: "not a directory".to_owned(),
        }
        .into());
    }
    Ok(canon)
}
