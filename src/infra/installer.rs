//! Production `Installer` implementation.
//!
//! Runs the plan's program as a child process bound to the workspace, with
//! a guaranteed timeout and kill. `tokio::time::timeout` around
//! `.output().await` does not kill the child when the deadline fires, so
//! this uses `tokio::select!` with an explicit `child.kill()`.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};

use crate::application::ports::Installer;
use crate::domain::{InstallPlan, ServiceError};

/// Cap on captured stderr. Diagnostics past this are discarded so a noisy
/// installer cannot grow the buffer without bound.
const STDERR_CAP: u64 = 64 * 1024;

/// Subprocess-backed installer.
pub struct ProcessInstaller {
    timeout: Duration,
}

impl ProcessInstaller {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, workspace: &Path, plan: &InstallPlan) -> Result<(), ServiceError> {
        let mut child = Command::new(&plan.program)
            .args(&plan.args)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ServiceError::Process {
                program: plan.program.clone(),
                source,
            })?;

        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stderr) = tokio::join!(child.wait(), capture_stderr(stderr_handle));
                let status = status.map_err(|source| ServiceError::Process {
                    program: plan.program.clone(),
                    source,
                })?;
                if status.success() {
                    Ok(())
                } else {
                    Err(ServiceError::InstallFailed {
                        program: plan.program.clone(),
                        status,
                        stderr,
                    })
                }
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                Err(ServiceError::InstallTimedOut {
                    program: plan.program.clone(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Read stderr up to [`STDERR_CAP`] bytes, then drain the remainder so the
/// child never blocks on a full pipe.
async fn capture_stderr(handle: Option<ChildStderr>) -> String {
    let Some(stderr) = handle else {
        return String::new();
    };
    let mut head = stderr.take(STDERR_CAP);
    let mut buf = Vec::new();
    let _ = head.read_to_end(&mut buf).await;
    let mut rest = head.into_inner();
    let _ = tokio::io::copy(&mut rest, &mut tokio::io::sink()).await;
    String::from_utf8_lossy(&buf).into_owned()
}
