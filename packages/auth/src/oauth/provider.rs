// ABOUTME: OAuth provider definitions for account sign-in
// ABOUTME: Google and Microsoft endpoints, scopes, and credential environment variables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Redirect registered for the mobile app's custom URL scheme
pub const DEFAULT_REDIRECT_URI: &str = "com.gobookmarker:/oauth2callback";

/// Supported identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Microsoft,
}

impl OAuthProvider {
    /// Get authorization URL for this provider
    pub fn auth_url(&self) -> &str {
        match self {
            Self::Google => "https://accounts.google.com/o/oauth2/auth",
            Self::Microsoft => "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
        }
    }

    /// Get token exchange URL for this provider
    pub fn token_url(&self) -> &str {
        match self {
            Self::Google => "https://oauth2.googleapis.com/token",
            Self::Microsoft => "https://login.microsoftonline.com/common/oauth2/v2.0/token",
        }
    }

    /// Profile endpoint queried after sign-in
    pub fn userinfo_url(&self) -> &str {
        match self {
            Self::Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            Self::Microsoft => "https://graph.microsoft.com/v1.0/me",
        }
    }

    /// Profile access plus the app-private cloud folder
    pub fn scopes(&self) -> &[&str] {
        match self {
            Self::Google => &[
                "https://www.googleapis.com/auth/userinfo.email",
                "https://www.googleapis.com/auth/drive.appdata",
            ],
            Self::Microsoft => &["offline_access", "User.Read", "Files.ReadWrite.AppFolder"],
        }
    }

    /// Environment variables holding the client id and secret
    pub fn credential_env_vars(&self) -> (&'static str, &'static str) {
        match self {
            Self::Google => ("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
            Self::Microsoft => ("MS_CLIENT_ID", "MS_CLIENT_SECRET"),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Google, Self::Microsoft]
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Microsoft => write!(f, "microsoft"),
        }
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "microsoft" | "ms" => Ok(Self::Microsoft),
            _ => Err(AuthError::InvalidProvider(format!(
                "Unknown provider: {}. Supported: google, microsoft",
                s
            ))),
        }
    }
}
