use tokio_util::sync::CancellationToken;

use crate::apply::ManifestApplier;
use crate::completion;
use crate::config::AppConfig;
use crate::confirm::{self, ConfirmationPrompter};
use crate::error::{PipelineError, PipelineResult};
use crate::llm::CompletionBackend;
use crate::output;
use crate::prompt::PromptRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    BackendReady,
    CompletionReceived,
    Confirmed,
    Rejected,
    Applied,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Applied,
    Skipped,
}

pub struct PipelineDeps<'a> {
    pub backend: &'a dyn CompletionBackend,
    pub prompter: &'a mut dyn ConfirmationPrompter,
    pub applier: &'a dyn ManifestApplier,
}

/// One prompt-to-apply run. Every failure is terminal and at most one apply
/// is attempted.
pub async fn run<S: AsRef<str>>(
    cancel: &CancellationToken,
    config: &AppConfig,
    args: &[S],
    deps: PipelineDeps<'_>,
) -> PipelineResult<RunOutcome> {
    enter(Stage::Start);
    let request = PromptRequest::from_args(args)?;
    enter(Stage::BackendReady);

    let manifest = completion::complete(
        cancel,
        deps.backend,
        &request,
        &config.backend,
        config.pipeline.kube.namespace.as_deref(),
    )
    .await
    .inspect_err(abort)?;
    enter(Stage::CompletionReceived);

    output::print_manifest_preview(&manifest);

    let accepted =
        confirm::confirm(config.pipeline.require_confirmation, deps.prompter).inspect_err(abort)?;
    if !accepted {
        enter(Stage::Rejected);
        enter(Stage::Skipped);
        return Ok(RunOutcome::Skipped);
    }
    enter(Stage::Confirmed);

    // The prompt read does not race the token, so an interrupt that landed
    // while it blocked is honoured here, before anything touches the cluster.
    if cancel.is_cancelled() {
        abort(&PipelineError::Cancelled);
        return Err(PipelineError::Cancelled);
    }

    deps.applier.apply(&manifest).inspect_err(abort)?;
    enter(Stage::Applied);
    Ok(RunOutcome::Applied)
}

fn enter(stage: Stage) {
    tracing::debug!(stage = ?stage, "pipeline stage");
}

fn abort(err: &PipelineError) {
    tracing::warn!(error = %err, "pipeline aborted");
}
