use async_trait::async_trait;

use super::types::{HttpReply, TokenRequest, TransportError, UploadPart};

/// Core trait for talking to a tempfiles server
///
/// Implementations only move bytes; status codes are interpreted by the callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /api/v1/file` with a single multipart `file` part
    async fn upload_file(&self, part: UploadPart) -> Result<HttpReply, TransportError>;

    /// `POST /api/v1/auth/token` as a form
    async fn create_token(&self, request: &TokenRequest) -> Result<HttpReply, TransportError>;

    /// `DELETE /api/v1/auth/token/{name}`
    async fn delete_token(&self, name: &str) -> Result<HttpReply, TransportError>;

    /// `GET /api/v1/auth/token`
    async fn whoami(&self) -> Result<HttpReply, TransportError>;
}
