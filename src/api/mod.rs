// Gateway module for the server API - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access API functionality
pub use http::HttpTransport;
#[cfg(test)]
pub use traits::MockTransport;
pub use traits::Transport;
pub use types::{
    HttpReply, Identity, IssuedToken, TokenRequest, TransportError, UploadBody, UploadInfo,
    UploadPart,
};
