mod alternate;
mod api_error;
mod direct;
mod wire;

use std::future::Future;
use std::pin::Pin;

use crate::config::BackendConfig;
use crate::error::{PipelineError, PipelineResult};

pub use alternate::AlternateClient;
pub use direct::DirectClient;
pub use wire::CompletionResponse;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Direct,
    Alternate,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Direct => "openai",
            BackendKind::Alternate => "azure-openai",
        }
    }
}

pub trait CompletionBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = PipelineResult<CompletionResponse>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub enum CompletionClient {
    Direct(DirectClient),
    Alternate(AlternateClient),
}

impl CompletionBackend for CompletionClient {
    fn kind(&self) -> BackendKind {
        match self {
            CompletionClient::Direct(_) => BackendKind::Direct,
            CompletionClient::Alternate(_) => BackendKind::Alternate,
        }
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = PipelineResult<CompletionResponse>> + Send + 'a>> {
        match self {
            CompletionClient::Direct(client) => Box::pin(client.complete(request)),
            CompletionClient::Alternate(client) => Box::pin(client.complete(request)),
        }
    }
}

/// Picks the alternate endpoint when one is configured, otherwise the public API.
pub fn select_backend(config: &BackendConfig) -> PipelineResult<CompletionClient> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("kubectl-ai/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| PipelineError::BackendConstruction(err.to_string()))?;

    let client = match config.alternate_endpoint.as_deref() {
        Some(endpoint) => CompletionClient::Alternate(AlternateClient::new(
            http,
            endpoint,
            &config.alternate_api_version,
            &config.deployment_name,
            &config.api_key,
        )?),
        None => CompletionClient::Direct(DirectClient::new(
            http,
            &config.direct_base_url,
            &config.api_key,
        )?),
    };
    tracing::debug!(
        backend = client.kind().as_str(),
        deployment = %config.deployment_name,
        "completion backend selected"
    );
    Ok(client)
}

pub(crate) fn parse_base_url(raw: &str, what: &str) -> PipelineResult<reqwest::Url> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|err| PipelineError::BackendConstruction(format!("invalid {what} '{raw}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PipelineError::BackendConstruction(format!(
            "invalid {what} '{raw}': scheme must be http or https"
        )));
    }
    if url.cannot_be_a_base() {
        return Err(PipelineError::BackendConstruction(format!(
            "invalid {what} '{raw}': not a base URL"
        )));
    }
    Ok(url)
}

pub(crate) fn join_path(base: &reqwest::Url, segments: &[&str]) -> PipelineResult<reqwest::Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            PipelineError::BackendConstruction(format!("'{base}' cannot be used as a base URL"))
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}
