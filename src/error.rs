//! Error taxonomy for the download pipeline.
//!
//! Every failure a request can hit maps to one variant, and every variant
//! carries a fixed HTTP status and a fixed user-facing sentence. Diagnostic
//! detail (child stderr, exit status, I/O context) stays in the log fields
//! and never reaches the response body.

use std::process::ExitStatus;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::pages;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// Request failed validation. The message is already user-facing.
    #[error("{0}")]
    InvalidInput(String),

    /// The downloader executable is not on PATH.
    #[error("downloader binary `{0}` not found")]
    ToolMissing(String),

    /// The downloader ran and exited non-zero.
    #[error("downloader reported {status}")]
    ProcessFailed { status: ExitStatus, stderr: String },

    /// The downloader blew through its wall-clock limit and was killed.
    #[error("downloader timed out after {0:?}")]
    Timeout(Duration),

    /// The downloader exited cleanly but left no `downloaded.*` file behind.
    #[error("downloader produced no output file")]
    NoArtifact,

    /// Anything else: scratch dir creation, file opens, spawn failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ToolMissing(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ProcessFailed { .. } => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            Self::NoArtifact => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sentence shown on the page. Kept stable so nothing internal leaks.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::ToolMissing(_) => "yt-dlp is not installed on this server.".to_string(),
            Self::ProcessFailed { .. } => {
                "Download failed. URL may be invalid, restricted, or blocked.".to_string()
            }
            Self::Timeout(_) => {
                "Download timed out. Please try a shorter or different video.".to_string()
            }
            Self::NoArtifact => "No file was produced by downloader.".to_string(),
            Self::Io(_) => "Unexpected server error. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "download request failed");
        } else {
            warn!(status = %status, error = %self, "download request rejected");
        }
        let page = pages::home_with_notice(&self.user_message());
        (status, Html(page)).into_response()
    }
}
