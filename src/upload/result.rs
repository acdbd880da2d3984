use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{HttpReply, TransportError, UploadInfo};

/// Why a submission attempt ended without a link
///
/// Every variant is terminal for its attempt; the user retries by submitting again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select a file to upload.")]
    NoFile,

    #[error("Please enter some text to upload.")]
    EmptyText,

    #[error("Could not read the selected file: {0}")]
    Unreadable(String),

    #[error("Anonymous uploads are disabled on this server. Please log in to upload.")]
    Unauthorized,

    #[error("Upload failed (HTTP {0}).")]
    Http(u16),

    #[error("Upload finished but the server did not return a link.")]
    MissingLink,

    #[error("Error while uploading: {0}")]
    Transport(String),
}

impl UploadError {
    /// Failures detected before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NoFile | Self::EmptyText | Self::Unreadable(_))
    }
}

/// A finished upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub frontend_url: String,
    pub info: UploadInfo,
}

pub type SubmissionResult = Result<Uploaded, UploadError>;

/// Turn the outcome of `POST /api/v1/file` into a submission result
pub fn classify_upload_reply(reply: Result<HttpReply, TransportError>) -> SubmissionResult {
    let reply = reply.map_err(|e| {
        warn!("upload request failed: {}", e);
        UploadError::Transport(e.to_string())
    })?;

    match reply.status {
        401 => return Err(UploadError::Unauthorized),
        status if !reply.is_success() => {
            debug!(status, body = %String::from_utf8_lossy(&reply.body), "upload rejected");
            return Err(UploadError::Http(status));
        }
        _ => {}
    }

    let info: UploadInfo = reply
        .parse()
        .map_err(|e| UploadError::Transport(format!("malformed response: {}", e)))?;

    match info.url_frontend.clone().filter(|url| !url.is_empty()) {
        Some(frontend_url) => Ok(Uploaded { frontend_url, info }),
        None => Err(UploadError::MissingLink),
    }
}
