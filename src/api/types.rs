use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Raw answer of the server; classification is up to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Bytes,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a reply with a JSON body
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Errors raised before a reply could be obtained
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid request URL: {0}")]
    BadUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("could not open upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Content of the upload part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBody {
    /// Already in memory (pasted text)
    Bytes(Bytes),
    /// Streamed from disk at send time
    File { path: PathBuf, len: u64 },
}

impl UploadBody {
    pub fn len(&self) -> u64 {
        match self {
            Self::Bytes(bytes) => bytes.len() as u64,
            Self::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single `file` part of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub file_name: String,
    pub content_type: String,
    pub body: UploadBody,
}

/// Successful answer of `POST /api/v1/file`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadInfo {
    #[serde(default)]
    pub url_frontend: Option<String>,
    #[serde(default)]
    pub url_raw: Option<String>,
    #[serde(default)]
    pub url_infos: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub fid: Option<u64>,
}

impl UploadInfo {
    /// Labelled optional fields the server sent besides the frontend link
    pub fn extras(&self) -> Vec<(&'static str, String)> {
        let mut extras = Vec::new();
        if let Some(name) = &self.name {
            extras.push(("Name", name.clone()));
        }
        if let Some(content_type) = &self.content_type {
            extras.push(("Type", content_type.clone()));
        }
        if let Some(fid) = self.fid {
            extras.push(("ID", fid.to_string()));
        }
        if let Some(raw) = &self.url_raw {
            extras.push(("Raw", raw.clone()));
        }
        if let Some(infos) = &self.url_infos {
            extras.push(("Info", infos.clone()));
        }
        extras.retain(|(_, value)| !value.is_empty());
        extras
    }
}

/// Form body of `POST /api/v1/auth/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRequest {
    /// Lifetime in days
    #[serde(rename = "tokenDuration")]
    pub duration: u32,
    #[serde(rename = "tokenName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedToken {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub time_expiration: Option<String>,
    #[serde(default)]
    pub time_creation: Option<String>,
}

/// Answer of `GET /api/v1/auth/token`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    pub authenticated: bool,
    pub email: String,
    pub name: String,
    pub id: i64,
    #[serde(rename = "userKind")]
    pub user_kind: String,
}
