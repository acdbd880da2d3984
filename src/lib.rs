pub mod api;
pub mod app;
pub mod cli;
pub mod constants;
pub mod runtime;
pub mod tokens;
pub mod tui;
pub mod upload;
pub mod utils;

pub use app::{load_config, Config};
pub use tokens::{TokenError, TokenManager};
pub use tui::run_ui;
pub use upload::{UploadController, UploadError, UploadMode};
pub use utils::TempfilesError;
