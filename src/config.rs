use std::fmt;

use crate::cli::{Cli, KubeFlags};
use crate::error::{PipelineError, PipelineResult};

pub const MISSING_API_KEY_MESSAGE: &str = "Please provide an OpenAI key.";

/// Completion backend options, captured once at startup and never mutated.
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    pub deployment_name: String,
    pub api_key: String,
    pub alternate_endpoint: Option<String>,
    pub alternate_api_version: String,
    pub direct_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

// Hand-written so the key never reaches a log line.
impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("deployment_name", &self.deployment_name)
            .field("api_key", &"<redacted>")
            .field("alternate_endpoint", &self.alternate_endpoint)
            .field("alternate_api_version", &self.alternate_api_version)
            .field("direct_base_url", &self.direct_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub require_confirmation: bool,
    pub kube: KubeFlags,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub pipeline: PipelineSettings,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> PipelineResult<Self> {
        let api_key = cli.api_key.trim();
        if api_key.is_empty() {
            return Err(PipelineError::Configuration(
                MISSING_API_KEY_MESSAGE.to_string(),
            ));
        }

        let alternate_endpoint = Some(cli.azure_endpoint.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            backend: BackendConfig {
                deployment_name: cli.deployment_name.trim().to_string(),
                api_key: api_key.to_string(),
                alternate_endpoint,
                alternate_api_version: cli.azure_api_version.trim().to_string(),
                direct_base_url: cli.openai_base_url.trim().to_string(),
                temperature: cli.temperature,
                max_tokens: cli.max_tokens,
            },
            pipeline: PipelineSettings {
                require_confirmation: cli.require_confirmation,
                kube: cli.kube.clone(),
            },
        })
    }
}
