//! Ephemeral per-request workspaces.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Directory-name prefix for workspaces under the system temp root.
const WORKSPACE_PREFIX: &str = "packmule-";

/// An exclusively owned scratch directory backing one install request.
///
/// Uniqueness comes from the collision-resistant name generator, not from
/// locking; no two requests ever observe each other's workspace. The
/// directory and everything in it are removed when the value is dropped,
/// so a workspace cannot outlive its request on any exit path, panics
/// included.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh, uniquely named, empty workspace under the system
    /// temp root.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be
    /// allocated (permissions, disk exhaustion).
    pub fn acquire() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir()?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the workspace now instead of waiting for drop.
    ///
    /// The success path uses this so a failed cleanup can be logged; the
    /// drop guard swallows removal errors.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when recursive removal fails.
    pub fn release(self) -> io::Result<()> {
        self.dir.close()
    }
}
