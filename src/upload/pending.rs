use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::mime::{content_type_for, content_type_for_file};
use super::result::UploadError;
use crate::api::{UploadBody, UploadPart};
use crate::constants::DEFAULT_PASTE_BASENAME;

/// A file handle sitting in the file slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub content_type: &'static str,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = content_type_for_file(&name);

        Self {
            path,
            name,
            content_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> std::io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }

    /// Size of the file, failing unless it is an openable regular file
    pub async fn readable_len(&self) -> std::io::Result<u64> {
        let file = tokio::fs::File::open(&self.path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        Ok(metadata.len())
    }
}

/// `{custom}.{ext}` when a base name was given, `paste.{ext}` otherwise
pub fn synthesize_filename(custom_name: &str, extension: &str) -> String {
    let base = custom_name.trim();
    let base = if base.is_empty() {
        DEFAULT_PASTE_BASENAME
    } else {
        base
    };
    format!("{}.{}", base, extension)
}

/// What a single submission sends; exactly one variant per attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingUpload {
    File(SelectedFile),
    Text {
        file_name: String,
        content_type: &'static str,
        content: String,
    },
}

impl PendingUpload {
    /// Wrap pasted text as a file named after the selectors
    pub fn text(content: impl Into<String>, custom_name: &str, extension: &str) -> Self {
        Self::Text {
            file_name: synthesize_filename(custom_name, extension),
            content_type: content_type_for(extension),
            content: content.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::File(file) => &file.name,
            Self::Text { file_name, .. } => file_name,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::File(file) => file.content_type,
            Self::Text { content_type, .. } => content_type,
        }
    }

    /// Materialize the multipart part, reading file content from disk
    pub async fn into_part(self) -> Result<UploadPart, UploadError> {
        match self {
            Self::File(file) => {
                let len = file
                    .readable_len()
                    .await
                    .map_err(|e| UploadError::Unreadable(format!("{}: {}", file.name, e)))?;
                Ok(UploadPart {
                    file_name: file.name,
                    content_type: file.content_type.to_string(),
                    body: UploadBody::File {
                        path: file.path,
                        len,
                    },
                })
            }
            Self::Text {
                file_name,
                content_type,
                content,
            } => Ok(UploadPart {
                file_name,
                content_type: content_type.to_string(),
                body: UploadBody::Bytes(Bytes::from(content)),
            }),
        }
    }
}
