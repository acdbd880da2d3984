use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{HttpReply, Identity, IssuedToken, TokenRequest, Transport, TransportError};
use crate::constants::{TOKEN_NAME_MAX_CHARS, TOKEN_NAME_MIN_CHARS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Name is too short (at least {min} characters)", min = TOKEN_NAME_MIN_CHARS)]
    NameTooShort,

    #[error("Name is too long (at most {max} characters)", max = TOKEN_NAME_MAX_CHARS)]
    NameTooLong,

    #[error("Another Token already has this name. Use a different name.")]
    NameTaken,

    #[error("Not logged in, or the API token was rejected.")]
    Unauthorized,

    #[error("No token received from server")]
    MissingToken,

    #[error("Failed to delete token \"{0}\". Please try again.")]
    DeleteFailed(String),

    #[error("Request failed (HTTP {0}).")]
    Http(u16),

    #[error("Error while contacting the server: {0}")]
    Transport(String),
}

impl From<TransportError> for TokenError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Check the length bounds a token name must satisfy, counted in characters
pub fn validate_token_name(name: &str) -> Result<(), TokenError> {
    match name.chars().count() {
        n if n < TOKEN_NAME_MIN_CHARS => Err(TokenError::NameTooShort),
        n if n > TOKEN_NAME_MAX_CHARS => Err(TokenError::NameTooLong),
        _ => Ok(()),
    }
}

/// Create, revoke and inspect API tokens of the logged-in account
pub struct TokenManager {
    transport: Arc<dyn Transport>,
}

impl TokenManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Issue a token valid for `duration_days`; the secret is only shown once
    pub async fn create(&self, name: &str, duration_days: u32) -> Result<IssuedToken, TokenError> {
        validate_token_name(name)?;

        let request = TokenRequest {
            duration: duration_days,
            name: name.to_string(),
        };
        let reply = self.transport.create_token(&request).await?;
        let reply = check_status(reply)?;

        let issued: IssuedToken = reply
            .parse()
            .map_err(|e| TokenError::Transport(format!("malformed response: {}", e)))?;
        if issued.token.as_deref().map_or(true, str::is_empty) {
            warn!(name, "server accepted token request without returning a token");
            return Err(TokenError::MissingToken);
        }

        info!(name, duration_days, "token created");
        Ok(issued)
    }

    /// Revoke a token by name
    pub async fn delete(&self, name: &str) -> Result<(), TokenError> {
        let reply = self.transport.delete_token(name).await?;
        if !reply.is_success() {
            debug!(name, status = reply.status, "token deletion rejected");
            return Err(TokenError::DeleteFailed(name.to_string()));
        }
        info!(name, "token deleted");
        Ok(())
    }

    /// Who the configured credentials belong to
    pub async fn whoami(&self) -> Result<Identity, TokenError> {
        let reply = check_status(self.transport.whoami().await?)?;
        reply
            .parse()
            .map_err(|e| TokenError::Transport(format!("malformed response: {}", e)))
    }
}

fn check_status(reply: HttpReply) -> Result<HttpReply, TokenError> {
    match reply.status {
        401 => Err(TokenError::Unauthorized),
        409 => Err(TokenError::NameTaken),
        status if !reply.is_success() => Err(TokenError::Http(status)),
        _ => Ok(reply),
    }
}
