//! jpack - packages a runnable jar for Windows, Linux and Docker.
//!
//! Reads `jpack.toml`, runs every enabled platform and exits non-zero if
//! any of them failed to produce its deployable.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match jpack::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
