use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::cli::KubeFlags;
use crate::error::{PipelineError, PipelineResult};

pub trait ManifestApplier {
    fn apply(&self, manifest: &str) -> PipelineResult<()>;
}

/// Hands the manifest to `kubectl apply -f -`. Cluster and namespace
/// resolution is left entirely to kubectl and the forwarded flags.
#[derive(Debug, Clone)]
pub struct KubectlApplier {
    program: String,
    passthrough: Vec<String>,
}

impl KubectlApplier {
    pub fn new(flags: &KubeFlags) -> Self {
        Self::with_program("kubectl", flags)
    }

    pub fn with_program(program: impl Into<String>, flags: &KubeFlags) -> Self {
        Self {
            program: program.into(),
            passthrough: flags.to_args(),
        }
    }

    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec!["apply".to_string()];
        args.extend(self.passthrough.iter().cloned());
        args.push("-f".to_string());
        args.push("-".to_string());
        args
    }

    fn run(&self, manifest: &str) -> Result<()> {
        let program = which::which(&self.program)
            .with_context(|| format!("'{}' not found on PATH", self.program))?;
        let mut child = Command::new(&program)
            .args(self.command_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start {}", program.display()))?;
        if let Some(mut stdin) = child.stdin.take()
            && let Err(err) = stdin.write_all(manifest.as_bytes())
        {
            drop(stdin);
            // Reap the child before reporting so no zombie outlives the run.
            let _ = child.kill();
            let status = child.wait().ok();
            return Err(anyhow::Error::new(err).context(match status {
                Some(status) => format!(
                    "failed to send manifest to {} (exited with {})",
                    self.program, status
                ),
                None => format!("failed to send manifest to {}", self.program),
            }));
        }
        let status = child
            .wait()
            .with_context(|| format!("failed to wait for {}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("{} apply exited with {}", self.program, status))
        }
    }
}

impl ManifestApplier for KubectlApplier {
    fn apply(&self, manifest: &str) -> PipelineResult<()> {
        tracing::debug!(program = %self.program, args = ?self.command_args(), "applying manifest");
        self.run(manifest).map_err(|err| {
            tracing::warn!(error = %err, "apply failed");
            PipelineError::Apply(format!("{err:#}"))
        })
    }
}
