// ABOUTME: OAuth module providing sign-in flows for identity providers
// ABOUTME: Includes provider endpoints, client configuration, and the code-exchange client

pub mod client;
pub mod provider;
pub mod types;

pub use client::{IdentityProvider, OAuthClient};
pub use provider::OAuthProvider;
pub use types::{OAuthConfig, OAuthToken, TokenResponse};
