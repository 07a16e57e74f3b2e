//! Wire decoding: multipart form or JSON body into a `Manifest`.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;

use crate::domain::{Manifest, ServiceError, Toolchain};

/// Decode the request into a manifest, dispatching on content type.
///
/// A `multipart/form-data` body carries the descriptors as fields named
/// after the toolchain's filenames. Anything else is read as a single JSON
/// object keyed the same way, with unknown keys ignored. Both paths
/// produce identical manifests, so downstream code never sees the wire
/// encoding.
///
/// `limit` bounds the bytes read on the JSON path; the multipart path is
/// bounded to the same ceiling by the router's body-limit layer.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for unreadable or oversized bodies,
/// malformed JSON, and a missing or empty primary descriptor.
pub async fn decode_manifest(
    toolchain: Toolchain,
    limit: usize,
    req: Request,
) -> Result<Manifest, ServiceError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let (primary, lock) = if is_multipart {
        from_multipart(toolchain, req).await?
    } else {
        from_json(toolchain, limit, req.into_body()).await?
    };

    Manifest::new(primary.unwrap_or_default(), lock).ok_or_else(|| {
        ServiceError::Validation(format!(
            "missing {} in request",
            toolchain.manifest_file()
        ))
    })
}

async fn from_multipart(
    toolchain: Toolchain,
    req: Request,
) -> Result<(Option<String>, Option<String>), ServiceError> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ServiceError::Validation(format!("error parsing multipart form: {e}")))?;

    let mut primary = None;
    let mut lock = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(format!("error reading multipart form: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let text = field
            .text()
            .await
            .map_err(|e| ServiceError::Validation(format!("error reading {name}: {e}")))?;
        if name == toolchain.manifest_file() {
            primary = Some(text);
        } else if name == toolchain.lockfile() {
            lock = Some(text);
        }
    }
    Ok((primary, lock))
}

async fn from_json(
    toolchain: Toolchain,
    limit: usize,
    body: Body,
) -> Result<(Option<String>, Option<String>), ServiceError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ServiceError::Validation(format!("error reading request body: {e}")))?;
    let mut fields: HashMap<String, String> = serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::Validation(format!("error decoding request body: {e}")))?;
    Ok((
        fields.remove(toolchain.manifest_file()),
        fields.remove(toolchain.lockfile()),
    ))
}
