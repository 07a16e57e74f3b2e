//! Port trait definitions for the application layer.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{InstallPlan, ServiceError};

/// Abstracts installer execution so the pipeline can be tested without
/// invoking a real package manager.
///
/// Implementations run the plan with `workspace` as the working directory
/// and must leave the plan's output subtree under it on success. Standard
/// output is noise and is discarded; standard error is the diagnostic
/// channel and travels with the failure.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Execute the plan to completion.
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be spawned, exits non-zero
    /// (carrying captured stderr), or exceeds the configured deadline. On
    /// timeout the child must be killed, not left orphaned.
    async fn install(&self, workspace: &Path, plan: &InstallPlan) -> Result<(), ServiceError>;
}
