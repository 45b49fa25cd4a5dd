mod app;
mod apply;
mod cli;
mod completion;
mod config;
mod confirm;
mod error;
mod llm;
mod output;
mod pipeline;
mod prompt;
mod signal;
mod telemetry;
#[cfg(test)]
mod testing;

use clap::Parser;
use std::process::ExitCode;

use cli::Cli;
use pipeline::RunOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    match app::run(cli).await {
        Ok(outcome) => {
            if outcome == RunOutcome::Skipped {
                tracing::info!("manifest not applied");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
