//! # launchctl CLI
//!
//! This is the binary entry point for the `launchctl` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the bootstrap.
//! - Printing failures, with cleanup hints for anything left behind, and
//!   exiting with status 1.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;

use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use launchctl::output;

fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                process::exit(1);
            }
        },
    };

    let out = cli.output_config();
    if let Err(err) = cli.execute(&out) {
        let orphaned = err
            .downcast_ref::<launchctl::Error>()
            .map(|e| e.orphaned())
            .unwrap_or_default();
        for line in output::failure_lines(&out, &err.to_string(), orphaned) {
            eprintln!("{}", line);
        }
        process::exit(1);
    }
}
