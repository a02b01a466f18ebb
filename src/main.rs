//! timingsrc_build - builds every bundle variant of every timingsrc version.
//!
//! Echoes each tool invocation, keeps going past failures, and exits non-zero
//! if any variant failed.

use std::process;
use timingsrc_build::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
