// Gateway module for API token management - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod manager;

// Public re-exports - the ONLY way to access token functionality
pub use manager::{validate_token_name, TokenError, TokenManager};
