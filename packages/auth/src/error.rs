// ABOUTME: Error types for sign-in and OAuth operations
// ABOUTME: Covers provider configuration, code exchange, and user profile lookups

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("No token available: sign in first")]
    NoToken,

    #[error("User info request failed: {0}")]
    UserInfo(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
