use crate::constants::PREVIEWABLE_IMAGE_TYPES;

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extensions selectable for pasted text, with the content-type they are sent as
pub const TEXT_CONTENT_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("rs", "text/x-rust"),
    ("py", "text/x-python"),
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("html", "text/html"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("yaml", "application/x-yaml"),
    ("toml", "application/toml"),
    ("sh", "text/x-shellscript"),
    ("sql", "application/sql"),
    ("log", "text/plain"),
];

const IMAGE_CONTENT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

fn lookup(table: &[(&str, &'static str)], extension: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, content_type)| *content_type)
}

/// Content-type for synthesized text files; unknown extensions are plain text
pub fn content_type_for(extension: &str) -> &'static str {
    lookup(TEXT_CONTENT_TYPES, extension).unwrap_or(TEXT_PLAIN)
}

/// Content-type for a file picked from disk, judged by its name
pub fn content_type_for_file(file_name: &str) -> &'static str {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    lookup(IMAGE_CONTENT_TYPES, extension)
        .or_else(|| lookup(TEXT_CONTENT_TYPES, extension))
        .unwrap_or(OCTET_STREAM)
}

pub fn is_previewable_image(content_type: &str) -> bool {
    PREVIEWABLE_IMAGE_TYPES.contains(&content_type)
}

/// Position of `extension` in the selector, if it is one of ours
pub fn extension_index(extension: &str) -> Option<usize> {
    TEXT_CONTENT_TYPES
        .iter()
        .position(|(ext, _)| ext.eq_ignore_ascii_case(extension))
}
