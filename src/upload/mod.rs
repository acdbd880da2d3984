// Gateway module for the upload form - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod controller;
mod drop;
mod mime;
mod mode;
mod pending;
mod preview;
mod result;

// Public re-exports - the ONLY way to access upload functionality
pub use controller::{perform_upload, LinkNavigator, Navigator, UploadController};
pub use drop::parse_dropped_paths;
pub use mime::{content_type_for, content_type_for_file, extension_index, TEXT_CONTENT_TYPES};
pub use mode::UploadMode;
pub use pending::{synthesize_filename, PendingUpload, SelectedFile};
pub use preview::{
    file_preview, load_file_preview, text_preview, Preview, PreviewLoaded, PreviewRequest,
    PreviewSlot, PreviewTicket,
};
pub use result::{classify_upload_reply, SubmissionResult, UploadError, Uploaded};
