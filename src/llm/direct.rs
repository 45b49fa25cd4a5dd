use serde_json::{Value, json};

use super::wire::{CompletionResponse, decode_response};
use super::{CompletionRequest, join_path, parse_base_url};
use crate::error::PipelineResult;

const PROVIDER: &str = "OpenAI";

#[derive(Debug, Clone)]
pub struct DirectClient {
    http: reqwest::Client,
    url: reqwest::Url,
    api_key: String,
}

impl DirectClient {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> PipelineResult<Self> {
        let base = parse_base_url(base_url, "OpenAI base URL")?;
        Ok(Self {
            http,
            url: join_path(&base, &["completions"])?,
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
            .bearer_auth(&self.api_key)
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
        "model": request.model,
        "prompt": request.prompt,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
        "n": 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_to_completions_under_base_path() {
        let client =
            DirectClient::new(reqwest::Client::new(), "https://api.openai.com/v1", "sk").unwrap();
        assert_eq!(client.url().as_str(), "https://api.openai.com/v1/completions");
    }

    #[test]
    fn body_names_model_and_requests_single_choice() {
        let body = request_body(&CompletionRequest {
            prompt: "create a pod".to_string(),
            model: "text-davinci-003".to_string(),
            temperature: 0.0,
            max_tokens: 3500,
        });
        assert_eq!(body["model"], "text-davinci-003");
        assert_eq!(body["prompt"], "create a pod");
        assert_eq!(body["max_tokens"], 3500);
        assert_eq!(body["n"], 1);
    }

    #[tokio::test]
    async fn truncated_body_reports_transport_cause() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 512\r\n\r\n{\"choices\"",
                )
                .await;
        });

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = DirectClient::new(http, &format!("http://{addr}/v1"), "sk").unwrap();
        let err = client
            .complete(&CompletionRequest {
                prompt: "create a pod".to_string(),
                model: "text-davinci-003".to_string(),
                temperature: 0.0,
                max_tokens: 16,
            })
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("completion request failed"), "{message}");
        assert!(!message.contains("failed to parse"));
    }
}
