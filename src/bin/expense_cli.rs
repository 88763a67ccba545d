use std::process::ExitCode;

use clap::Parser;
use expense_core::{
    cli::{commands, output, Cli},
    init,
};

fn main() -> ExitCode {
    init();
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(err);
            ExitCode::FAILURE
        }
    }
}
