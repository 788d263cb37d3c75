// ABOUTME: OAuth client running the authorization code flow for one provider
// ABOUTME: Builds consent URLs, exchanges callback codes for tokens, and fetches the user profile

use async_trait::async_trait;
use bookmarker_core::User;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use url::Url;

use crate::error::{AuthError, AuthResult};
use crate::oauth::provider::OAuthProvider;
use crate::oauth::types::{OAuthConfig, OAuthToken, TokenResponse};

/// Sign-in operations the app needs from an identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> OAuthProvider;

    /// Consent page URL carrying `state` for CSRF protection
    fn auth_url(&self, state: &str) -> AuthResult<String>;

    /// Exchange the code delivered to the redirect URI and keep the token
    async fn handle_callback(&self, code: &str) -> AuthResult<OAuthToken>;

    /// Profile of the signed-in account
    async fn user_info(&self) -> AuthResult<User>;
}

/// Profile fields across Google userinfo and Microsoft Graph
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    id: String,
    email: Option<String>,
    mail: Option<String>,
    #[serde(rename = "userPrincipalName")]
    user_principal_name: Option<String>,
    name: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

/// Authorization code flow over reqwest
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
    token: RwLock<Option<OAuthToken>>,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            token: RwLock::new(None),
        }
    }

    /// Client configured from GOOGLE_* / MS_* environment variables
    pub fn from_env(provider: OAuthProvider) -> AuthResult<Self> {
        Ok(Self::new(OAuthConfig::from_env(provider)?))
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    pub async fn token(&self) -> Option<OAuthToken> {
        self.token.read().await.clone()
    }

    /// Restore a previously obtained token
    pub async fn set_token(&self, token: Option<OAuthToken>) {
        *self.token.write().await = token;
    }

    async fn exchange_code_for_token(&self, code: &str) -> AuthResult<TokenResponse> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = self.config.client_secret.as_deref() {
            params.push(("client_secret", secret));
        }

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            // Only the status is logged; the body may echo credentials
            error!("Token exchange failed with status {}", status);
            return Err(AuthError::TokenExchange(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl IdentityProvider for OAuthClient {
    fn provider(&self) -> OAuthProvider {
        self.config.provider
    }

    fn auth_url(&self, state: &str) -> AuthResult<String> {
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::Configuration(format!("Invalid auth URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("state", state);

        Ok(url.to_string())
    }

    async fn handle_callback(&self, code: &str) -> AuthResult<OAuthToken> {
        info!("Exchanging authorization code with {}", self.config.provider);

        let response = self.exchange_code_for_token(code).await?;
        let token = OAuthToken::from_response(response, chrono::Utc::now());
        *self.token.write().await = Some(token.clone());

        info!("✅ Signed in with {}", self.config.provider);
        Ok(token)
    }

    async fn user_info(&self) -> AuthResult<User> {
        let token = self.token().await.ok_or(AuthError::NoToken)?;
        debug!("Fetching profile from {}", self.config.userinfo_url);

        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::UserInfo(format!(
                "User info request failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let profile: ProfileResponse = serde_json::from_str(&body)?;

        let email = profile
            .email
            .or(profile.mail)
            .or(profile.user_principal_name)
            .unwrap_or_default();
        let name = profile.name.or(profile.display_name).unwrap_or_default();
        let id = if profile.id.is_empty() {
            email.clone()
        } else {
            format!("{}:{}", self.config.provider, profile.id)
        };

        Ok(User::new(id, email, name))
    }
}
