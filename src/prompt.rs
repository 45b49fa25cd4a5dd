use serde::Serialize;
use tera::{Context as TeraContext, Tera};

use crate::error::{PipelineError, PipelineResult};

const COMPLETION_PROMPT_TEMPLATE: &str = include_str!("prompts/completion_prompt.tera");

/// The user's instruction, built once from positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    text: String,
}

impl PromptRequest {
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> PipelineResult<Self> {
        if args.is_empty() {
            return Err(PipelineError::Usage);
        }
        let text = args
            .iter()
            .map(|arg| arg.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptInput<'a> {
    pub instruction: &'a str,
    pub namespace: Option<&'a str>,
}

pub fn render(input: &PromptInput<'_>) -> PipelineResult<String> {
    let context =
        TeraContext::from_serialize(input).map_err(|err| PipelineError::Prompt(err.to_string()))?;

    let rendered = Tera::one_off(COMPLETION_PROMPT_TEMPLATE, &context, false)
        .map_err(|err| PipelineError::Prompt(err.to_string()))?;
    Ok(rendered.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_arguments_with_single_spaces() {
        let request = PromptRequest::from_args(&["deploy", "nginx"]).unwrap();
        assert_eq!(request.text(), "deploy nginx");
    }

    #[test]
    fn keeps_inner_whitespace_of_each_argument() {
        let request = PromptRequest::from_args(&["create a", "pod"]).unwrap();
        assert_eq!(request.text(), "create a pod");
    }

    #[test]
    fn empty_arguments_are_a_usage_error() {
        let args: Vec<String> = Vec::new();
        assert!(matches!(
            PromptRequest::from_args(&args),
            Err(PipelineError::Usage)
        ));
    }

    #[test]
    fn renders_instruction_after_generator_preamble() {
        let rendered = render(&PromptInput {
            instruction: "create a pod named foo",
            namespace: None,
        })
        .unwrap();
        assert!(rendered.starts_with("You are a Kubernetes YAML generator"));
        assert!(rendered.ends_with("create a pod named foo"));
        assert!(!rendered.contains("namespace"));
    }

    #[test]
    fn mentions_namespace_when_selected() {
        let rendered = render(&PromptInput {
            instruction: "create a pod",
            namespace: Some("team-a"),
        })
        .unwrap();
        assert!(rendered.contains("\"team-a\" namespace"));
    }

    #[test]
    fn does_not_escape_instruction_text() {
        let rendered = render(&PromptInput {
            instruction: "label app=<web> & tier=\"front\"",
            namespace: None,
        })
        .unwrap();
        assert!(rendered.contains("label app=<web> & tier=\"front\""));
    }
}
