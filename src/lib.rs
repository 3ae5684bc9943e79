pub mod browse;
pub mod cli;
pub mod config;
pub mod constants;
pub mod io;
pub mod logging;
pub mod preview;
pub mod ui;
