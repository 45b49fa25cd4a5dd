use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Configuration(String),

    #[error("prompt must be provided")]
    Usage,

    #[error("failed to render completion prompt: {0}")]
    Prompt(String),

    #[error("failed to build completion client: {0}")]
    BackendConstruction(String),

    #[error("{0}")]
    Backend(String),

    #[error("completion request cancelled")]
    Cancelled,

    #[error("confirmation failed: {0}")]
    Confirmation(String),

    #[error("failed to apply manifest: {0}")]
    Apply(String),
}

impl PipelineError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        Self::backend(format!("completion request failed: {err}"))
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_matches_cli_message() {
        assert_eq!(PipelineError::Usage.to_string(), "prompt must be provided");
    }

    #[test]
    fn backend_errors_surface_cause_verbatim() {
        let err = PipelineError::backend("OpenAI API error (401 Unauthorized): bad key");
        assert_eq!(
            err.to_string(),
            "OpenAI API error (401 Unauthorized): bad key"
        );
    }

    #[test]
    fn cancellation_has_a_fixed_message() {
        assert_eq!(
            PipelineError::Cancelled.to_string(),
            "completion request cancelled"
        );
    }
}
