//! Truss - Declarative build-configuration resolver

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = truss_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
