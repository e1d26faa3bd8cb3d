// src/agent/process.rs
//! Dongles CLI agent
//!
//! One child process per record:
//! `<cli> [--emulator <main|dev>] <sign|encrypt> --root-key <hex>`.
//! The payload goes in on stdin, the artifact comes back base64 on stdout.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use super::{AgentSettings, CryptoAgent};
use crate::enums::{AgentMode, RecordTransform};
use crate::error::AgentError;
use crate::root_key::RootKeyHandle;

#[derive(Debug, Clone)]
pub struct ProcessAgent {
    settings: AgentSettings,
}

impl ProcessAgent {
    pub fn new(settings: AgentSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    fn command(&self, operation: RecordTransform, root: &RootKeyHandle) -> Command {
        let mut cmd = Command::new(&self.settings.cli_path);
        if let AgentMode::Emulator(mode) = self.settings.mode {
            cmd.arg("--emulator").arg(mode.as_str());
        }
        cmd.arg(operation.as_str())
            .arg("--root-key")
            .arg(root.material_hex().expose_secret())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn run(
        &self,
        operation: RecordTransform,
        value: &[u8],
        root: &RootKeyHandle,
    ) -> Result<Vec<u8>, AgentError> {
        let mut child = self
            .command(operation, root)
            .spawn()
            .map_err(|source| AgentError::Spawn {
                path: self.settings.cli_path.clone(),
                source,
            })?;

        // Stdin is fed on its own thread while this one drains stdout/stderr.
        // Dropping stdin closes the pipe so the agent sees EOF.
        let stdin = child.stdin.take();
        let (output, fed) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(value),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let fed = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (output, fed)
        });

        let output = output?;
        // A broken pipe means the agent quit early; its exit status says why.
        if let Err(e) = fed {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(AgentError::Io(e));
            }
        }

        if !output.status.success() {
            return Err(AgentError::Rejected {
                operation,
                status: output
                    .status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let encoded: Vec<u8> = output
            .stdout
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let artifact = STANDARD.decode(encoded)?;
        debug!(
            operation = %operation,
            input = value.len(),
            output = artifact.len(),
            "agent call finished"
        );
        Ok(artifact)
    }
}

impl CryptoAgent for ProcessAgent {
    fn sign(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        self.run(RecordTransform::Sign, value, root)
    }

    fn encrypt(&self, value: &[u8], root: &RootKeyHandle) -> Result<Vec<u8>, AgentError> {
        self.run(RecordTransform::Encrypt, value, root)
    }
}
