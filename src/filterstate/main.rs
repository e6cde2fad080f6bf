//! # Filterstate CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! Every subcommand takes a query string, runs one library operation on it and
//! prints the result, which makes the binary handy for poking at a filter
//! catalog from a shell or a test script:
//!
//! ```text
//! $ filterstate set 'timeRange=date&date=2024-05-01' timeRange today
//! timeRange=today
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
