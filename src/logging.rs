use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::constants::{LOG_ENV, LOG_FILE_ENV};

/// Installs the tracing subscriber.
///
/// Logging is off unless `PICK_TEMPLATE_LOG` holds a filter. Output goes to
/// `PICK_TEMPLATE_LOG_FILE` when set, since stderr carries the UI.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let file = std::env::var_os(LOG_FILE_ENV).and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);
    let _ = match file {
        Some(file) => builder.with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}
