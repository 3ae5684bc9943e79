use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_MAX_PREVIEW_BYTES, PREVIEWER_ENV};

#[derive(Parser, Debug)]
#[command(name = "pick-template")]
#[command(
    about = "Browse a directory of text and markdown templates, preview them, and print the \
             chosen path to stdout.",
    long_about = "Browse a directory of text and markdown templates, preview them, and print the \
                  chosen path to stdout.\n\nExit status: 0 when a path was printed, 1 when the \
                  picker was cancelled, 2 on usage or setup errors."
)]
pub struct Cli {
    /// Root directory to browse, defaults to the current directory.
    pub root: Option<PathBuf>,

    /// Pick a directory instead of a file (Ctrl+N creates a new one).
    #[arg(short = 'd', long = "directory")]
    pub directory: bool,

    /// Hide the preview pane.
    #[arg(short = 'P', long = "no-preview", conflicts_with = "directory")]
    pub no_preview: bool,

    /// Command used for rich previews; the selected path is appended as the last argument.
    #[arg(short = 'p', long = "previewer", env = PREVIEWER_ENV)]
    pub previewer: Option<String>,

    /// Maximum number of bytes read for the plain-text preview.
    #[arg(short = 's', long = "max-preview-bytes", default_value_t = DEFAULT_MAX_PREVIEW_BYTES)]
    pub max_preview_bytes: u64,
}
