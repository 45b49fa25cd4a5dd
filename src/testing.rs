use anyhow::{Result, anyhow};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::apply::ManifestApplier;
use crate::confirm::ConfirmationPrompter;
use crate::error::{PipelineError, PipelineResult};
use crate::llm::{BackendKind, CompletionBackend, CompletionRequest, CompletionResponse};

pub enum Script {
    Reply(CompletionResponse),
    Fail(&'static str),
    Hang,
}

pub struct FakeBackend {
    script: Script,
    calls: AtomicUsize,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl FakeBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Script::Reply(CompletionResponse::from_texts([text])))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<CompletionRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl CompletionBackend for FakeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Direct
    }

    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = PipelineResult<CompletionResponse>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            match &self.script {
                Script::Reply(response) => Ok(response.clone()),
                Script::Fail(message) => Err(PipelineError::backend(message)),
                Script::Hang => std::future::pending().await,
            }
        })
    }
}

pub struct ScriptedPrompter {
    answer: Option<String>,
    pub asked: usize,
}

impl ScriptedPrompter {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            asked: 0,
        }
    }

    pub fn aborting() -> Self {
        Self {
            answer: None,
            asked: 0,
        }
    }
}

impl ConfirmationPrompter for ScriptedPrompter {
    fn select(&mut self, _label: &str, _options: &[&str]) -> Result<String> {
        self.asked += 1;
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("confirmation aborted"))
    }
}

#[derive(Default)]
pub struct RecordingApplier {
    applied: Mutex<Vec<String>>,
    fail_with: Option<&'static str>,
}

impl RecordingApplier {
    pub fn failing(message: &'static str) -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail_with: Some(message),
        }
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.lock().unwrap().clone()
    }
}

impl ManifestApplier for RecordingApplier {
    fn apply(&self, manifest: &str) -> PipelineResult<()> {
        self.applied.lock().unwrap().push(manifest.to_string());
        match self.fail_with {
            Some(message) => Err(PipelineError::Apply(message.to_string())),
            None => Ok(()),
        }
    }
}
