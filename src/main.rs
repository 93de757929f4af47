use std::process::ExitCode;

use clap::Parser;
use resto_admin::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "resto-admin exited with an error");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
