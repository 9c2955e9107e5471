//! The `POST /download` pipeline: decode and validate the form, run the
//! downloader in a scratch directory, then stream the artifact back as an
//! attachment. The scratch directory rides inside the response body stream
//! and is removed when the stream is dropped, success or not.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::Form;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::response::Response;
use futures_util::Stream;
use http::header;
use serde::Deserialize;
use tempfile::TempDir;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use crate::artifact::{self, Artifact};
use crate::error::{DownloadError, Result};
use crate::router::AppState;
use crate::runner;
use crate::validate::{self, MediaFormat, Platform};

/// Prefix for per-request scratch directories under the system temp dir.
pub const WORKDIR_PREFIX: &str = "vidgrab_";

/// Raw form fields. Both are optional strings so that validation order and
/// wording stay under our control instead of serde's.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

/// A request that survived validation.
#[derive(Debug)]
struct DownloadRequest {
    url: String,
    format: MediaFormat,
    platform: Platform,
}

/// Checks run in a fixed order: URL shape first, then format, then the
/// platform allow-list. Each failure carries its user-facing sentence.
fn validate_form(form: &DownloadForm) -> Result<DownloadRequest> {
    let url = form.url.as_deref().unwrap_or_default().trim();
    if url.is_empty() || !validate::is_valid_http_url(url) {
        return Err(DownloadError::InvalidInput(
            "Please provide a valid http/https URL.".to_string(),
        ));
    }

    let format = match form.format.as_deref() {
        None => MediaFormat::default(),
        Some(token) => MediaFormat::parse(token).ok_or_else(|| {
            DownloadError::InvalidInput("Invalid format selected.".to_string())
        })?,
    };

    let platform = Platform::detect(url);
    if platform == Platform::Unknown {
        return Err(DownloadError::InvalidInput(
            "Only YouTube and Kling AI URLs are allowed in this educational demo.".to_string(),
        ));
    }

    Ok(DownloadRequest {
        url: url.to_string(),
        format,
        platform,
    })
}

#[axum::debug_handler]
pub async fn download(
    State(state): State<AppState>,
    form: std::result::Result<Form<DownloadForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form.map_err(|rejection| {
        warn!(%rejection, "unreadable download form");
        DownloadError::InvalidInput("Request is too large or invalid.".to_string())
    })?;
    let request = validate_form(&form)?;

    let bin = which::which(&state.config.downloader_bin)
        .map_err(|_| DownloadError::ToolMissing(state.config.downloader_bin.clone()))?;

    // Slot gate: bounds how many downloader processes run at once, later
    // requests wait here in arrival order.
    let _permit = state
        .downloads
        .acquire()
        .await
        .expect("download semaphore is never closed");

    let workdir = tempfile::Builder::new().prefix(WORKDIR_PREFIX).tempdir()?;
    info!(
        url = %request.url,
        format = ?request.format,
        platform = request.platform.label(),
        workdir = %workdir.path().display(),
        "starting download"
    );

    runner::run(
        &bin,
        request.format,
        &request.url,
        workdir.path(),
        state.config.timeout(),
    )
    .await?;

    let artifact = artifact::locate(workdir.path())?;
    info!(
        path = %artifact.path.display(),
        bytes = artifact.len,
        "artifact ready, streaming"
    );

    stream_artifact(workdir, artifact, request.format).await
}

/// Builds the streaming attachment response. The working directory is moved
/// into the body stream so it outlives the handler and is cleaned up only
/// after the last byte (or a client disconnect).
async fn stream_artifact(
    workdir: TempDir,
    artifact: Artifact,
    format: MediaFormat,
) -> Result<Response> {
    let file = tokio::fs::File::open(&artifact.path).await?;
    let stream = ArtifactStream {
        inner: ReaderStream::new(file),
        _workdir: workdir,
    };

    let response = Response::builder()
        .header(header::CONTENT_TYPE, format.mime())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.attachment_name()),
        )
        .header(header::CONTENT_LENGTH, artifact.len)
        .body(Body::from_stream(stream))
        .unwrap();
    Ok(response)
}

/// File chunks plus ownership of the scratch directory they come from.
struct ArtifactStream {
    inner: ReaderStream<tokio::fs::File>,
    _workdir: TempDir,
}

impl Stream for ArtifactStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}
