use std::process::ExitCode;

use clap::Parser;
use news_app::{run, Cli};
use news_core::LoadPhase;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    news_logging::initialize(cli.log_destination(), cli.log_level());

    let mut stdout = std::io::stdout().lock();
    let exit = match run(&cli, &mut stdout)? {
        LoadPhase::Delivered => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    };
    Ok(exit)
}
