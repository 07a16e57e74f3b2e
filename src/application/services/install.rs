//! The install pipeline for one request.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::Installer;
use crate::config::Config;
use crate::domain::{Manifest, ServiceError, Toolchain};
use crate::infra::archive;
use crate::infra::workspace::Workspace;

/// A finalized archive ready to stream: an unlinked temp file plus its
/// byte length. The backing workspace is already gone by the time one of
/// these exists.
pub struct ArchiveSpool {
    pub file: std::fs::File,
    pub len: u64,
}

/// Runs a decoded manifest through workspace allocation, descriptor
/// writes, installer execution, output verification, and archiving.
pub struct InstallService {
    toolchain: Toolchain,
    installer_bin: Option<String>,
    installer: Arc<dyn Installer>,
}

impl InstallService {
    #[must_use]
    pub fn new(config: &Config, installer: Arc<dyn Installer>) -> Self {
        Self {
            toolchain: config.toolchain,
            installer_bin: config.installer_bin.clone(),
            installer,
        }
    }

    /// Run the full pipeline for one manifest.
    ///
    /// The workspace is removed on every exit path: explicitly before the
    /// spool is returned on success, and by the drop guard on failure.
    ///
    /// # Errors
    ///
    /// Returns an error when the workspace cannot be allocated or
    /// populated, the installer fails or produces no output subtree, or
    /// the archive cannot be built.
    pub async fn install(&self, manifest: &Manifest) -> Result<ArchiveSpool, ServiceError> {
        let workspace = Workspace::acquire().map_err(ServiceError::Workspace)?;
        self.write_descriptors(&workspace, manifest).await?;

        let mut plan = self.toolchain.plan(manifest.is_locked());
        if let Some(bin) = &self.installer_bin {
            plan.program.clone_from(bin);
        }

        info!(
            program = %plan.program,
            locked = plan.locked,
            workspace = %workspace.path().display(),
            "invoking installer",
        );
        self.installer.install(workspace.path(), &plan).await?;

        let output = workspace.path().join(&plan.output_dir);
        if !output.is_dir() {
            return Err(ServiceError::OutputMissing(plan.output_dir));
        }

        let spool = tokio::task::spawn_blocking(move || archive::build_spool(&output))
            .await
            .map_err(|e| ServiceError::Archive(std::io::Error::other(e)))?
            .map_err(ServiceError::Archive)?;
        let len = spool.metadata().map_err(ServiceError::Archive)?.len();

        if let Err(e) = workspace.release() {
            warn!(error = %e, "failed to remove workspace");
        }
        info!(bytes = len, "install completed");
        Ok(ArchiveSpool { file: spool, len })
    }

    async fn write_descriptors(
        &self,
        workspace: &Workspace,
        manifest: &Manifest,
    ) -> Result<(), ServiceError> {
        let primary = self.toolchain.manifest_file();
        tokio::fs::write(workspace.path().join(primary), manifest.primary())
            .await
            .map_err(|source| ServiceError::DescriptorWrite {
                file: primary.to_string(),
                source,
            })?;

        if let Some(lock) = manifest.lock() {
            let lockfile = self.toolchain.lockfile();
            tokio::fs::write(workspace.path().join(lockfile), lock)
                .await
                .map_err(|source| ServiceError::DescriptorWrite {
                    file: lockfile.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}
