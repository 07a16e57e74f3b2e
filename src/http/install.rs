//! `POST /install`: decode, install, stream the archive back.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use tokio_util::io::ReaderStream;
use tracing::warn;

use super::{decode, AppState};
use crate::domain::ServiceError;

/// Handle one install request end to end.
///
/// Failures up to and including archive construction happen before the
/// first response byte and come back as proper HTTP statuses. Once the
/// spooled archive starts streaming, a failure can only be logged and the
/// connection truncated; the client sees a short read.
pub async fn handle(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, ServiceError> {
    let manifest =
        decode::decode_manifest(state.config.toolchain, state.config.body_limit, req).await?;
    let spool = state.service.install(&manifest).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/zip"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(spool.len));
    let disposition = format!("attachment; filename=\"{}\"", state.config.download_name());
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    let stream = ReaderStream::new(tokio::fs::File::from_std(spool.file))
        .inspect_err(|e| warn!(error = %e, "archive stream aborted mid-response"));
    Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
}
