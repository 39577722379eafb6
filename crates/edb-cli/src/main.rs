use edb_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init();

    // Parse CLI and dispatch; subcommands surface an exit code so the
    // primary tool treats the hook like any external downloader process.
    match CliCommand::run_from_args().await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("edb error: {:#}", err);
            std::process::exit(1);
        }
    }
}
