pub mod browser;
pub mod interactive;
pub mod picker;
pub mod render;

// Re-export the TUI entrypoint function
pub use interactive::pick_path;
pub use picker::{Outcome, Picker};
