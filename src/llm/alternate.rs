use serde_json::{Value, json};

use super::wire::{CompletionResponse, decode_response};
use super::{CompletionRequest, join_path, parse_base_url};
use crate::error::PipelineResult;

const PROVIDER: &str = "Azure OpenAI";

/// Azure-style deployment endpoint. The model is addressed by the URL path,
/// so the request body carries no model name.
#[derive(Debug, Clone)]
pub struct AlternateClient {
    http: reqwest::Client,
    url: reqwest::Url,
    api_key: String,
}

impl AlternateClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        api_version: &str,
        deployment: &str,
        api_key: &str,
    ) -> PipelineResult<Self> {
        let base = parse_base_url(endpoint, "Azure OpenAI endpoint")?;
        let mut url = join_path(&base, &["openai", "deployments", deployment, "completions"])?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(Self {
            http,
            url,
            api_key: api_key.to_string(),
        })
    }

    #[cfg(test)]
    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    pub async fn complete(&self, request: &CompletionRequest) -> PipelineResult<CompletionResponse> {
        let response = self
            .http
            .post(self.url.clone())
            .header("api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;
        let status = response.status();
        let payload = response.text().await?;
        decode_response(PROVIDER, status, &payload)
    }
}

fn request_body(request: &CompletionRequest) -> Value {
    json!({
        "prompt": request.prompt,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
        "n": 1
    })
}
