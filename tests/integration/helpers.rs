//! Shared test helpers: request builders and recording `Installer` fakes.

#![allow(dead_code)]
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;

use packmule::application::ports::Installer;
use packmule::config::Config;
use packmule::domain::{InstallPlan, ServiceError, Toolchain};
use packmule::http::{router, AppState};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we
/// shift. On Windows `ExitStatusExt::from_raw` takes the code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

// ── Recording installer fake ─────────────────────────────────────────────────

/// One recorded installer invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub workspace: PathBuf,
    pub plan: InstallPlan,
    /// Filenames present in the workspace root when the installer ran.
    pub files: Vec<String>,
}

/// What a [`FakeInstaller`] does when invoked.
pub enum Behavior {
    /// Create the output subtree and populate it with the given entries
    /// (`None` content means a directory).
    ProduceTree(Vec<(&'static str, Option<&'static str>)>),
    /// Create the output subtree holding one file named after the primary
    /// descriptor's first line. Lets concurrent requests prove they only
    /// see their own content.
    EchoPrimary,
    /// Exit non-zero with the given stderr.
    Fail(&'static str),
    /// Report success without creating the output subtree.
    NoOutput,
}

/// Recording fake for the `Installer` port.
pub struct FakeInstaller {
    behavior: Behavior,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeInstaller {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    async fn install(&self, workspace: &Path, plan: &InstallPlan) -> Result<(), ServiceError> {
        let mut files: Vec<String> = std::fs::read_dir(workspace)
            .expect("read workspace")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        self.calls.lock().expect("calls lock").push(RecordedCall {
            workspace: workspace.to_path_buf(),
            plan: plan.clone(),
            files,
        });

        let output = workspace.join(&plan.output_dir);
        match &self.behavior {
            Behavior::ProduceTree(entries) => {
                std::fs::create_dir(&output).expect("create output dir");
                for (rel, contents) in entries {
                    let path = output.join(rel);
                    match contents {
                        None => std::fs::create_dir_all(&path).expect("create dir entry"),
                        Some(text) => {
                            if let Some(parent) = path.parent() {
                                std::fs::create_dir_all(parent).expect("create parent");
                            }
                            std::fs::write(&path, text).expect("write file entry");
                        }
                    }
                }
                Ok(())
            }
            Behavior::EchoPrimary => {
                let primary = std::fs::read_to_string(workspace.join("requirements.txt"))
                    .expect("read primary descriptor");
                let name = primary.lines().next().unwrap_or("empty").to_owned();
                std::fs::create_dir(&output).expect("create output dir");
                std::fs::write(output.join(format!("{name}.txt")), &primary)
                    .expect("write echo file");
                Ok(())
            }
            Behavior::Fail(stderr) => Err(ServiceError::InstallFailed {
                program: plan.program.clone(),
                status: exit_status(1),
                stderr: (*stderr).to_string(),
            }),
            Behavior::NoOutput => Ok(()),
        }
    }
}

// ── App and request construction ─────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        toolchain: Toolchain::Pip,
        installer_bin: None,
        archive_name: None,
        body_limit: 1024 * 1024,
        install_timeout_secs: 30,
    }
}

pub fn app(installer: Arc<FakeInstaller>) -> Router {
    app_with_config(test_config(), installer)
}

pub fn app_with_config(config: Config, installer: Arc<FakeInstaller>) -> Router {
    router(AppState::new(config, installer))
}

pub fn json_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/install")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

const BOUNDARY: &str = "PackmuleTestBoundary";

pub fn multipart_request(fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, contents) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
             filename=\"{name}\"\r\n\r\n{contents}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Request::builder()
        .method("POST")
        .uri("/install")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("build request")
}

// ── Response inspection ──────────────────────────────────────────────────────

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec()
}

pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

/// Entry names of the returned archive, in archive order.
pub fn zip_entry_names(bytes: &[u8]) -> Vec<String> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut archive = zip::ZipArchive::new(cursor).expect("open returned zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("zip entry").name().to_owned())
        .collect()
}
