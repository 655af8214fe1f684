mod platform;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use platform::{Args, Outcome};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    platform::logging::initialize(args.log.into());

    let file_settings = match &args.config {
        Some(path) => platform::load_file_settings(path)?,
        None => Default::default(),
    };
    let settings = platform::Settings::resolve(args, file_settings);

    let code = match platform::run_app(settings) {
        Outcome::AllSeparated => ExitCode::SUCCESS,
        Outcome::SomeFailed => ExitCode::from(1),
        Outcome::Rejected => ExitCode::from(2),
    };
    Ok(code)
}
