//! Command line entry point.

use clap::Parser;
use eqbalance_app::{App, AppOptions};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting EqBalance");

    let options = AppOptions::parse();
    let result =
        App::new(&options).and_then(|mut app| app.run(&options, &mut std::io::stdout().lock()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("eqbalance: {err}");
            ExitCode::FAILURE
        }
    }
}
