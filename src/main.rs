use std::process::ExitCode;

use anyhow::Result;
use pick_template::{
    config::Config,
    constants::EXIT_ERROR,
    io::output,
    logging,
    ui,
};

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("pick-template: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let config = Config::from_cli()?;
    let outcome = ui::pick_path(&config)?;
    let code = output::emit(&outcome, &mut std::io::stdout().lock())?;
    Ok(code)
}
