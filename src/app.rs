use crate::apply::KubectlApplier;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::confirm::TerminalPrompter;
use crate::error::PipelineResult;
use crate::llm;
use crate::pipeline::{self, PipelineDeps, RunOutcome};
use crate::signal;

pub async fn run(cli: Cli) -> PipelineResult<RunOutcome> {
    let config = AppConfig::from_cli(&cli)?;
    tracing::debug!(backend = ?config.backend, "configuration loaded");

    let cancel = signal::install_interrupt_handler();
    let backend = llm::select_backend(&config.backend)?;
    let mut prompter = TerminalPrompter::new();
    let applier = KubectlApplier::new(&config.pipeline.kube);

    pipeline::run(
        &cancel,
        &config,
        cli.prompt.as_slice(),
        PipelineDeps {
            backend: &backend,
            prompter: &mut prompter,
            applier: &applier,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::error::PipelineError;

    #[tokio::test]
    async fn blank_api_key_stops_before_any_component_runs() {
        let cli = Cli::try_parse_from([
            "kubectl-ai",
            "--openai-api-key",
            " ",
            "--azure-openai-endpoint",
            "::not-a-url::",
            "create",
            "a",
            "pod",
        ])
        .unwrap();

        // A malformed endpoint would fail backend construction, so getting a
        // configuration error shows nothing past the key check ran.
        let err = run(cli).await.unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert_eq!(err.to_string(), "Please provide an OpenAI key.");
    }
}
