// ABOUTME: Core type definitions for OAuth sign-in
// ABOUTME: Client configuration, token responses, and the token held for the signed-in session

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::oauth::provider::{OAuthProvider, DEFAULT_REDIRECT_URI};

/// Everything needed to run the authorization code flow against one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub provider: OAuthProvider,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// Provider defaults with credentials taken from the process environment
    pub fn from_env(provider: OAuthProvider) -> AuthResult<Self> {
        Self::from_lookup(provider, |key| std::env::var(key).ok())
    }

    /// Provider defaults with credentials taken from an arbitrary lookup
    pub fn from_lookup<F>(provider: OAuthProvider, lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (id_var, secret_var) = provider.credential_env_vars();
        let client_id = lookup(id_var)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AuthError::Configuration(format!("{} is not set", id_var)))?;

        Ok(Self {
            provider,
            client_id,
            client_secret: lookup(secret_var).filter(|v| !v.is_empty()),
            auth_url: provider.auth_url().to_string(),
            token_url: provider.token_url().to_string(),
            userinfo_url: provider.userinfo_url().to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: provider.scopes().iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// OAuth token response from provider
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>, // Seconds
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Token held for the signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_at: response.expires_in.map(|secs| now + Duration::seconds(secs)),
        }
    }

    /// Tokens without an expiry are treated as valid
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
