use async_trait::async_trait;
use reqwest::{multipart, Body, Client, RequestBuilder, Url};
use tracing::debug;

use super::traits::Transport;
use super::types::{HttpReply, TokenRequest, TransportError, UploadBody, UploadPart};
use crate::app::{HttpConfig, ServerConfig};
use crate::constants::{API_AUTH_TOKEN_PATH, API_FILE_PATH, UPLOAD_FIELD_NAME};
use crate::utils::TempfilesError;

/// reqwest-backed transport for a single tempfiles instance
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpTransport {
    /// Create a new transport for the configured server
    pub fn new(server: &ServerConfig, http: &HttpConfig) -> Result<Self, TempfilesError> {
        let mut base_url = Url::parse(&server.base_url)
            .map_err(|e| TempfilesError::BadUrl(format!("{}: {}", server.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TempfilesError::BadUrl(server.base_url.clone()));
        }
        // Keep a trailing slash so instances mounted below a path prefix stay reachable
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(http.timeout_secs))
                .build()?,
            base_url,
            api_token: server.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::BadUrl(format!("{}: {}", path, e)))
    }

    /// URL of a named token, with the name escaped as one path segment
    fn token_url(&self, name: &str) -> Result<Url, TransportError> {
        let mut url = self.endpoint(API_AUTH_TOKEN_PATH)?;
        url.path_segments_mut()
            .map_err(|_| TransportError::BadUrl(API_AUTH_TOKEN_PATH.to_string()))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpReply, TransportError> {
        let response = self.authorize(request).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, bytes = body.len(), "received reply");
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload_file(&self, part: UploadPart) -> Result<HttpReply, TransportError> {
        let url = self.endpoint(API_FILE_PATH)?;
        let len = part.body.len();
        debug!(%url, file = %part.file_name, bytes = len, "uploading");

        // Files are streamed from disk, never buffered whole
        let body = match part.body {
            UploadBody::Bytes(bytes) => Body::from(bytes),
            UploadBody::File { path, .. } => Body::from(tokio::fs::File::open(&path).await?),
        };
        let file_part = multipart::Part::stream_with_length(body, len)
            .file_name(part.file_name)
            .mime_str(&part.content_type)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, file_part);

        self.send(self.client.post(url).multipart(form)).await
    }

    async fn create_token(&self, request: &TokenRequest) -> Result<HttpReply, TransportError> {
        let url = self.endpoint(API_AUTH_TOKEN_PATH)?;
        debug!(%url, name = %request.name, "requesting token");
        self.send(self.client.post(url).form(request)).await
    }

    async fn delete_token(&self, name: &str) -> Result<HttpReply, TransportError> {
        let url = self.token_url(name)?;
        debug!(%url, "deleting token");
        self.send(self.client.delete(url)).await
    }

    async fn whoami(&self) -> Result<HttpReply, TransportError> {
        let url = self.endpoint(API_AUTH_TOKEN_PATH)?;
        self.send(self.client.get(url)).await
    }
}
