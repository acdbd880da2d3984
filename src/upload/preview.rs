use std::io::Cursor;

use super::mime::is_previewable_image;
use super::pending::SelectedFile;
use crate::constants::{PREVIEW_MAX_BYTES, TEXT_PREVIEW_CHARS, TEXT_PREVIEW_ELLIPSIS};

/// One rendered preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Image {
        file_name: String,
        format: String,
        width: u32,
        height: u32,
        size: usize,
    },
    /// Not an allow-listed image, or it failed to decode
    Unavailable { file_name: String },
    Unreadable { file_name: String, reason: String },
    Text {
        file_name: String,
        chars: usize,
        body: String,
    },
}

impl Preview {
    pub fn header(&self) -> String {
        match self {
            Self::Text {
                file_name, chars, ..
            } => format!("Preview: {} ({} characters)", file_name, chars),
            Self::Image { file_name, .. }
            | Self::Unavailable { file_name }
            | Self::Unreadable { file_name, .. } => format!("Preview: {}", file_name),
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::Image {
                format,
                width,
                height,
                size,
                ..
            } => format!(
                "{} image, {}x{} pixels, {}",
                format,
                width,
                height,
                human_size(*size)
            ),
            Self::Unavailable { .. } => "No preview for this file type".to_string(),
            Self::Unreadable { reason, .. } => format!("Could not read file: {}", reason),
            Self::Text { body, .. } => body.clone(),
        }
    }
}

/// Text preview, or nothing for empty content
pub fn text_preview(file_name: &str, content: &str) -> Option<Preview> {
    if content.is_empty() {
        return None;
    }

    let chars = content.chars().count();
    let mut body: String = content.chars().take(TEXT_PREVIEW_CHARS).collect();
    if chars > TEXT_PREVIEW_CHARS {
        body.push_str(TEXT_PREVIEW_ELLIPSIS);
    }

    Some(Preview::Text {
        file_name: file_name.to_string(),
        chars,
        body,
    })
}

/// Classify freshly read bytes against the image allow-list
pub fn file_preview(file: &SelectedFile, bytes: &[u8]) -> Preview {
    let unavailable = || Preview::Unavailable {
        file_name: file.name.clone(),
    };

    if !is_previewable_image(file.content_type) {
        return unavailable();
    }

    let Ok(reader) = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format() else {
        return unavailable();
    };
    let Some(format) = reader.format() else {
        return unavailable();
    };
    match reader.into_dimensions() {
        Ok((width, height)) => Preview::Image {
            file_name: file.name.clone(),
            format: format!("{:?}", format).to_uppercase(),
            width,
            height,
            size: bytes.len(),
        },
        Err(_) => unavailable(),
    }
}

/// Read a file off the controller's hands and build its preview
///
/// Only allow-listed images up to [`PREVIEW_MAX_BYTES`] are read at all.
pub async fn load_file_preview(request: PreviewRequest) -> PreviewLoaded {
    let file = &request.file;
    let unreadable = |e: std::io::Error| Preview::Unreadable {
        file_name: file.name.clone(),
        reason: e.to_string(),
    };

    let preview = if !is_previewable_image(file.content_type) {
        Preview::Unavailable {
            file_name: file.name.clone(),
        }
    } else {
        match tokio::fs::metadata(&file.path).await {
            Err(e) => unreadable(e),
            Ok(meta) if meta.len() > PREVIEW_MAX_BYTES => Preview::Unavailable {
                file_name: file.name.clone(),
            },
            Ok(_) => match file.read().await {
                Ok(bytes) => file_preview(file, &bytes),
                Err(e) => unreadable(e),
            },
        }
    };

    PreviewLoaded {
        ticket: request.ticket,
        preview,
    }
}

fn human_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Identifies one preview read; later tickets supersede earlier ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreviewTicket(u64);

/// An asynchronous preview read waiting to be run by the host
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub ticket: PreviewTicket,
    pub file: SelectedFile,
}

/// Completion of a [`PreviewRequest`]
#[derive(Debug, Clone)]
pub struct PreviewLoaded {
    pub ticket: PreviewTicket,
    pub preview: Preview,
}

/// The fixed place a preview renders into; holds at most one preview
#[derive(Debug, Default)]
pub struct PreviewSlot {
    current: Option<Preview>,
    latest: u64,
}

impl PreviewSlot {
    /// Start a new read, invalidating every ticket issued before
    pub fn issue(&mut self) -> PreviewTicket {
        self.latest += 1;
        PreviewTicket(self.latest)
    }

    /// Install a read's result unless a newer read or a clear happened since
    pub fn apply(&mut self, ticket: PreviewTicket, preview: Preview) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.current = Some(preview);
        true
    }

    /// Replace synchronously; also supersedes outstanding reads
    pub fn set(&mut self, preview: Option<Preview>) {
        self.latest += 1;
        self.current = preview;
    }

    pub fn clear(&mut self) {
        self.set(None);
    }

    pub fn get(&self) -> Option<&Preview> {
        self.current.as_ref()
    }

    /// Number of live previews, 0 or 1
    pub fn len(&self) -> usize {
        usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    // 1x1 transparent GIF
    const TINY_GIF: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
        0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
        0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
    ];

    #[test]
    fn test_text_preview_header() {
        let preview = text_preview("notes.md", "hello").unwrap();
        assert_eq!(preview.header(), "Preview: notes.md (5 characters)");
        assert_eq!(preview.body(), "hello");
    }

    #[test]
    fn test_text_preview_truncates_at_500_chars() {
        let content = "é".repeat(501);
        let preview = text_preview("paste.txt", &content).unwrap();
        assert_eq!(preview.header(), "Preview: paste.txt (501 characters)");
        let body = preview.body();
        assert!(body.ends_with("..."));
        assert_eq!(body.chars().count(), 500 + 3);

        let exact = "a".repeat(500);
        assert_eq!(text_preview("a.txt", &exact).unwrap().body(), exact);
    }

    #[test]
    fn test_empty_text_has_no_preview() {
        assert_eq!(text_preview("paste.txt", ""), None);
    }

    #[test]
    fn test_image_preview() {
        let file = SelectedFile::from_path("/x/pixel.gif");
        let preview = file_preview(&file, TINY_GIF);
        assert_eq!(
            preview,
            Preview::Image {
                file_name: "pixel.gif".to_string(),
                format: "GIF".to_string(),
                width: 1,
                height: 1,
                size: TINY_GIF.len(),
            }
        );
        assert_eq!(preview.body(), format!("GIF image, 1x1 pixels, {} B", TINY_GIF.len()));
    }

    #[test]
    fn test_non_image_and_broken_image_have_no_preview() {
        let file = SelectedFile::from_path("/x/report.pdf");
        assert_eq!(
            file_preview(&file, b"%PDF-1.7").body(),
            "No preview for this file type"
        );

        let file = SelectedFile::from_path("/x/fake.png");
        assert_eq!(
            file_preview(&file, b"definitely not a png"),
            Preview::Unavailable {
                file_name: "fake.png".to_string()
            }
        );
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut slot = PreviewSlot::default();
        let older = slot.issue();
        let newer = slot.issue();
        let text = |name: &str| text_preview(name, "x").unwrap();

        // newer read resolves first, then the older one arrives late
        assert!(slot.apply(newer, text("new.txt")));
        assert!(!slot.apply(older, text("old.txt")));
        assert_eq!(slot.get(), Some(&text("new.txt")));
        assert_eq!(slot.len(), 1);
    }

    #[test]
    fn test_clear_supersedes_pending_reads() {
        let mut slot = PreviewSlot::default();
        let ticket = slot.issue();
        slot.clear();
        assert!(!slot.apply(ticket, text_preview("a.txt", "x").unwrap()));
        assert!(slot.is_empty());
    }

    #[test]
    fn test_new_preview_evicts_old_one() {
        let mut slot = PreviewSlot::default();
        slot.set(text_preview("a.txt", "first"));
        slot.set(text_preview("b.txt", "second"));
        assert_eq!(slot.len(), 1);
        assert_eq!(slot.get().unwrap().header(), "Preview: b.txt (6 characters)");
    }

    #[tokio::test]
    async fn test_load_file_preview() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pixel.gif");
        std::fs::write(&path, TINY_GIF).unwrap();

        let mut slot = PreviewSlot::default();
        let request = PreviewRequest {
            ticket: slot.issue(),
            file: SelectedFile::from_path(&path),
        };
        let loaded = load_file_preview(request).await;
        assert!(slot.apply(loaded.ticket, loaded.preview));
        assert!(matches!(slot.get(), Some(Preview::Image { width: 1, .. })));
    }

    #[tokio::test]
    async fn test_load_missing_file_preview() {
        let mut slot = PreviewSlot::default();
        let request = PreviewRequest {
            ticket: slot.issue(),
            file: SelectedFile::from_path("/definitely/not/here.png"),
        };
        let loaded = load_file_preview(request).await;
        assert!(matches!(loaded.preview, Preview::Unreadable { .. }));
    }

    #[tokio::test]
    async fn test_non_image_and_oversized_image_are_not_read() {
        let mut slot = PreviewSlot::default();

        // a missing file proves nothing was opened
        let request = PreviewRequest {
            ticket: slot.issue(),
            file: SelectedFile::from_path("/definitely/not/here.iso"),
        };
        let loaded = load_file_preview(request).await;
        assert_eq!(
            loaded.preview,
            Preview::Unavailable {
                file_name: "here.iso".to_string()
            }
        );

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge.png");
        let sparse = std::fs::File::create(&path).unwrap();
        sparse.set_len(PREVIEW_MAX_BYTES + 1).unwrap();
        let request = PreviewRequest {
            ticket: slot.issue(),
            file: SelectedFile::from_path(&path),
        };
        let loaded = load_file_preview(request).await;
        assert_eq!(loaded.preview.body(), "No preview for this file type");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(12), "12 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
    }
}
