//! Server configuration loaded from environment variables via `envy`.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::Toolchain;

/// Configuration for the install service.
///
/// Each field maps to `PACKMULE_<FIELD>`:
///   - `PACKMULE_LISTEN_ADDR`          (default `0.0.0.0:8080`)
///   - `PACKMULE_TOOLCHAIN`            (`pip` or `npm`, default `pip`)
///   - `PACKMULE_INSTALLER_BIN`        (optional, overrides the toolchain's program)
///   - `PACKMULE_ARCHIVE_NAME`         (optional, overrides the download filename)
///   - `PACKMULE_BODY_LIMIT`           (request-body ceiling in bytes, default 20 MiB)
///   - `PACKMULE_INSTALL_TIMEOUT_SECS` (default 600)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Socket address to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Installer backend handling every request on this server.
    #[serde(default)]
    pub toolchain: Toolchain,

    /// Alternative installer binary (absolute path or `$PATH` name).
    pub installer_bin: Option<String>,

    /// Download filename presented in `Content-Disposition`.
    pub archive_name: Option<String>,

    /// Ceiling on request-body bytes for both wire encodings.
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// Deadline for one installer run; the child is killed past it.
    #[serde(default = "default_install_timeout_secs")]
    pub install_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_body_limit() -> usize {
    20 * 1024 * 1024
}

const fn default_install_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Load configuration from `PACKMULE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but unparseable.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("PACKMULE_").from_env()
    }

    /// Filename offered to the client for the archive download.
    #[must_use]
    pub fn download_name(&self) -> &str {
        self.archive_name
            .as_deref()
            .unwrap_or(self.toolchain.archive_name())
    }

    #[must_use]
    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }
}
