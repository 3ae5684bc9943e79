// Centralized magic numbers & default values
use std::time::Duration;

pub const DEFAULT_MAX_PREVIEW_BYTES: u64 = 1024 * 1024;
pub const SNIFF_BYTES: usize = 1024;
pub const HIDDEN_MARKER: char = '.';
pub const TEMPLATE_EXTENSIONS: &[&str] = &[
    "txt", "md", "text", "mdown", "mkd", "markdown", "mkdn", "mdwn",
];
/// Pause after which typed characters start a new type-select query.
pub const TYPE_SELECT_RESET: Duration = Duration::from_millis(1000);
pub const PREVIEWER_ENV: &str = "PICK_TEMPLATE_PREVIEWER";
pub const LOG_ENV: &str = "PICK_TEMPLATE_LOG";
pub const LOG_FILE_ENV: &str = "PICK_TEMPLATE_LOG_FILE";
pub const EXIT_CANCELLED: u8 = 1;
pub const EXIT_ERROR: u8 = 2;
