//! Binary crate for the `qweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Printing the report (stdout) or an error document (stderr)

use std::process::ExitCode;

mod cli;
mod logging;
mod output;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = match cli::Cli::parse_from_args(std::env::args_os()) {
        Ok(cmd) => cmd,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    logging::init(cmd.verbose);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&err);
            ExitCode::FAILURE
        }
    }
}
