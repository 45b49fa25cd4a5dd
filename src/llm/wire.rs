use reqwest::StatusCode;
use serde::Deserialize;

use super::api_error::extract_api_error;
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[cfg(test)]
impl CompletionResponse {
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: texts
                .into_iter()
                .map(|text| CompletionChoice {
                    text: text.into(),
                    finish_reason: Some("stop".to_string()),
                })
                .collect(),
        }
    }
}

pub(super) fn decode_response(
    provider: &str,
    status: StatusCode,
    payload: &str,
) -> PipelineResult<CompletionResponse> {
    if !status.is_success() {
        return Err(PipelineError::Backend(format!(
            "{} API error ({}): {}",
            provider,
            status,
            extract_api_error(payload)
        )));
    }
    serde_json::from_str(payload).map_err(|err| {
        PipelineError::Backend(format!("failed to parse {provider} response JSON: {err}"))
    })
}
