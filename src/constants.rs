/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const API_FILE_PATH: &str = "/api/v1/file";
pub const API_AUTH_TOKEN_PATH: &str = "/api/v1/auth/token";
pub const UPLOAD_FIELD_NAME: &str = "file";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 300; // large uploads over slow links

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_EVENT_CHANNEL_SIZE: usize = 32;

// Previews
pub const TEXT_PREVIEW_CHARS: usize = 500;
pub const TEXT_PREVIEW_ELLIPSIS: &str = "...";
pub const PREVIEWABLE_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
/// Images larger than this are not read for a preview
pub const PREVIEW_MAX_BYTES: u64 = 20 * 1024 * 1024;

// Text uploads
pub const DEFAULT_PASTE_BASENAME: &str = "paste";
pub const DEFAULT_TEXT_EXTENSION: &str = "txt";

// API tokens
pub const TOKEN_NAME_MIN_CHARS: usize = 5;
pub const TOKEN_NAME_MAX_CHARS: usize = 40;
pub const DEFAULT_TOKEN_DURATION_DAYS: u32 = 30;
