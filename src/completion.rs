use tokio_util::sync::CancellationToken;

use crate::config::BackendConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::llm::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::prompt::{self, PromptInput, PromptRequest};

/// Sends one completion request and returns the first choice's text.
///
/// The network call races `cancel`; whichever finishes first wins and the
/// losing future is dropped. There is no retry.
pub async fn complete(
    cancel: &CancellationToken,
    backend: &dyn CompletionBackend,
    request: &PromptRequest,
    config: &BackendConfig,
    namespace: Option<&str>,
) -> PipelineResult<String> {
    let rendered = prompt::render(&PromptInput {
        instruction: request.text(),
        namespace,
    })?;
    let completion_request = CompletionRequest {
        prompt: rendered,
        model: config.deployment_name.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    tracing::debug!(
        backend = backend.kind().as_str(),
        model = %completion_request.model,
        temperature = completion_request.temperature,
        "requesting completion"
    );

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!("completion cancelled before the backend responded");
            return Err(PipelineError::Cancelled);
        }
        result = backend.complete(&completion_request) => result?,
    };

    first_choice_text(response)
}

fn first_choice_text(response: CompletionResponse) -> PipelineResult<String> {
    let count = response.choices.len();
    tracing::debug!(choices = count, "completion received");
    let Some(choice) = response.choices.into_iter().next() else {
        return Err(PipelineError::Backend(
            "no choices returned from completion backend".to_string(),
        ));
    };
    if choice.finish_reason.as_deref() == Some("length") {
        tracing::warn!("completion hit the token limit; the manifest may be truncated");
    }
    let text = strip_fences(&choice.text);
    if text.is_empty() {
        return Err(PipelineError::Backend(
            "completion backend returned empty text".to_string(),
        ));
    }
    Ok(text)
}

// Only unwraps output that is exactly one fenced block; anything else is kept as is.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let lines = trimmed.lines().collect::<Vec<_>>();
    if lines.len() < 2
        || !lines[0].trim_start().starts_with("```")
        || lines[lines.len() - 1].trim() != "```"
    {
        return trimmed.to_string();
    }

    let body = &lines[1..lines.len() - 1];
    if body.iter().any(|line| line.trim_start().starts_with("```")) {
        return trimmed.to_string();
    }
    body.join("\n").trim().to_string()
}
