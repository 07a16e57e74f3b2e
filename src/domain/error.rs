//! Typed errors for the install pipeline.
//!
//! Every failure a request can hit before its response starts streaming is
//! a variant here; the HTTP layer owns the mapping to status codes. The
//! `#[error]` messages are the plain-text bodies clients see, so they name
//! the offending file or program rather than internal modules.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors surfaced to the request handler boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed, missing, or oversized request input.
    #[error("{0}")]
    Validation(String),

    /// The per-request workspace could not be allocated.
    #[error("failed to allocate workspace: {0}")]
    Workspace(#[source] io::Error),

    /// A descriptor file could not be written into the workspace.
    #[error("failed to write {file} into workspace: {source}")]
    DescriptorWrite {
        file: String,
        #[source]
        source: io::Error,
    },

    /// The installer process could not be started or awaited.
    #[error("failed to run {program}: {source}")]
    Process {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The installer exited non-zero; `stderr` carries its diagnostics.
    #[error("{program} failed ({status}):\n{stderr}")]
    InstallFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The installer outlived the configured deadline and was killed.
    #[error("{program} timed out after {timeout_secs}s")]
    InstallTimedOut { program: String, timeout_secs: u64 },

    /// The installer exited zero but left no output subtree behind.
    #[error("installer reported success but produced no {0}/ directory")]
    OutputMissing(String),

    /// The output subtree could not be archived.
    #[error("failed to build archive: {0}")]
    Archive(#[source] io::Error),
}
