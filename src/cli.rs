use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser};

pub const DEFAULT_DEPLOYMENT_NAME: &str = "text-davinci-003";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2022-12-01";

#[derive(Debug, Parser)]
#[command(
    name = "kubectl-ai",
    version,
    about = "Generate Kubernetes manifests from natural language and apply them"
)]
pub struct Cli {
    /// Natural-language description of the resources to create
    #[arg(value_name = "PROMPT")]
    pub prompt: Vec<String>,

    /// The deployment name used for the model in OpenAI service
    #[arg(
        long = "openai-deployment-name",
        env = "OPENAI_DEPLOYMENT_NAME",
        default_value = DEFAULT_DEPLOYMENT_NAME
    )]
    pub deployment_name: String,

    /// The API key for the OpenAI service. This is required
    #[arg(
        long = "openai-api-key",
        env = "OPENAI_API_KEY",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub api_key: String,

    /// The endpoint for Azure OpenAI service. If provided, Azure OpenAI service is used instead of OpenAI
    #[arg(long = "azure-openai-endpoint", env = "AZURE_OPENAI_ENDPOINT", default_value = "")]
    pub azure_endpoint: String,

    /// API version sent to the Azure OpenAI service
    #[arg(
        long = "azure-openai-api-version",
        env = "AZURE_OPENAI_API_VERSION",
        default_value = DEFAULT_AZURE_API_VERSION
    )]
    pub azure_api_version: String,

    /// Base URL of the OpenAI API
    #[arg(long = "openai-base-url", env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    pub openai_base_url: String,

    /// Whether to require confirmation before applying the manifest
    #[arg(
        long = "require-confirmation",
        env = "REQUIRE_CONFIRMATION",
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        action = ArgAction::Set
    )]
    pub require_confirmation: bool,

    /// Sampling temperature between 0 and 1. Closer to 0 is more deterministic
    #[arg(
        long = "temperature",
        env = "TEMPERATURE",
        default_value_t = 0.0,
        value_parser = parse_temperature
    )]
    pub temperature: f32,

    /// Maximum number of tokens to generate
    #[arg(long = "max-tokens", env = "MAX_TOKENS", default_value_t = 3500)]
    pub max_tokens: u32,

    /// Emit debug logs to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(flatten)]
    pub kube: KubeFlags,
}

/// Cluster selection flags forwarded unmodified to `kubectl apply`.
#[derive(Debug, Clone, Default, Args)]
pub struct KubeFlags {
    /// Path to the kubeconfig file to use for CLI requests
    #[arg(long = "kubeconfig")]
    pub kubeconfig: Option<String>,

    /// The name of the kubeconfig context to use
    #[arg(long = "context")]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long = "cluster")]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long = "user")]
    pub user: Option<String>,

    /// If present, the namespace scope for this CLI request
    #[arg(short = 'n', long = "namespace")]
    pub namespace: Option<String>,

    /// The address and port of the Kubernetes API server
    #[arg(short = 's', long = "server")]
    pub server: Option<String>,

    /// Bearer token for authentication to the API server
    #[arg(long = "token")]
    pub token: Option<String>,

    /// Username to impersonate for the operation
    #[arg(long = "as")]
    pub impersonate: Option<String>,

    /// If true, the server's certificate will not be checked for validity
    #[arg(long = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,

    /// Path to a cert file for the certificate authority
    #[arg(long = "certificate-authority")]
    pub certificate_authority: Option<String>,

    /// Path to a client certificate file for TLS
    #[arg(long = "client-certificate")]
    pub client_certificate: Option<String>,

    /// Path to a client key file for TLS
    #[arg(long = "client-key")]
    pub client_key: Option<String>,

    /// The length of time to wait before giving up on a single server request
    #[arg(long = "request-timeout")]
    pub request_timeout: Option<String>,
}

impl KubeFlags {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let valued = [
            ("--kubeconfig", &self.kubeconfig),
            ("--context", &self.context),
            ("--cluster", &self.cluster),
            ("--user", &self.user),
            ("--namespace", &self.namespace),
            ("--server", &self.server),
            ("--token", &self.token),
            ("--as", &self.impersonate),
            ("--certificate-authority", &self.certificate_authority),
            ("--client-certificate", &self.client_certificate),
            ("--client-key", &self.client_key),
            ("--request-timeout", &self.request_timeout),
        ];
        for (flag, value) in valued {
            if let Some(value) = value {
                args.push(format!("{flag}={value}"));
            }
        }
        if self.insecure_skip_tls_verify {
            args.push("--insecure-skip-tls-verify=true".to_string());
        }
        args
    }
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("temperature must be between 0 and 1, got {value}"));
    }
    Ok(value)
}
