//! Main application entry point.

use clap::Parser;
use doodle_app::Args;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Starting Doodle");

    match pollster::block_on(doodle_app::run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
