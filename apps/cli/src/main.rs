//! # `masa` Entry Point
//!
//! The actual setup is in lib.rs so commands can be tested without a
//! process.

use std::process::ExitCode;

fn main() -> ExitCode {
    masa_cli::run()
}
