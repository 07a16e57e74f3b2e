//! Installer backend presets and the plans derived from them.

use serde::Deserialize;

/// A supported installer backend.
///
/// A toolchain binds an installer program to its descriptor filenames, its
/// mode-dependent argument lists, the subtree it installs into, and the
/// default name of the archive handed back to the client. The active
/// toolchain is chosen by configuration; requests cannot switch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    #[default]
    Pip,
    Npm,
}

/// A concrete installer invocation derived from a toolchain and a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Program to execute. Defaults to the toolchain's installer; the
    /// server configuration may point it elsewhere.
    pub program: String,
    pub args: Vec<String>,
    /// Subtree under the workspace the installer must produce.
    pub output_dir: String,
    /// True when the lock descriptor selected the reproducible mode.
    pub locked: bool,
}

impl Toolchain {
    /// Filename of the mandatory primary descriptor.
    #[must_use]
    pub fn manifest_file(self) -> &'static str {
        match self {
            Self::Pip => "requirements.txt",
            Self::Npm => "package.json",
        }
    }

    /// Filename of the optional lock/constraints descriptor.
    #[must_use]
    pub fn lockfile(self) -> &'static str {
        match self {
            Self::Pip => "constraints.txt",
            Self::Npm => "package-lock.json",
        }
    }

    #[must_use]
    pub fn program(self) -> &'static str {
        match self {
            Self::Pip => "pip",
            Self::Npm => "npm",
        }
    }

    /// Subtree the installer leaves its output in, relative to the
    /// workspace root.
    #[must_use]
    pub fn output_dir(self) -> &'static str {
        match self {
            Self::Pip => "site-packages",
            Self::Npm => "node_modules",
        }
    }

    /// Default download filename for the archived output.
    #[must_use]
    pub fn archive_name(self) -> &'static str {
        match self {
            Self::Pip => "python_packages.zip",
            Self::Npm => "node_modules.zip",
        }
    }

    /// Derive the invocation for this toolchain in the given mode.
    ///
    /// `locked` selects the strict, reproducible install (pip with a
    /// constraints file, `npm ci`); otherwise the resolving install runs.
    #[must_use]
    pub fn plan(self, locked: bool) -> InstallPlan {
        let args: &[&str] = match (self, locked) {
            (Self::Pip, false) => &["install", "-r", "requirements.txt", "--target", "site-packages"],
            (Self::Pip, true) => &[
                "install",
                "-r",
                "requirements.txt",
                "--target",
                "site-packages",
                "-c",
                "constraints.txt",
            ],
            (Self::Npm, false) => &["install"],
            (Self::Npm, true) => &["ci"],
        };
        InstallPlan {
            program: self.program().to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            output_dir: self.output_dir().to_string(),
            locked,
        }
    }
}
