// ABOUTME: Bookmarker sign-in library providing OAuth flows for identity providers
// ABOUTME: Supports Google and Microsoft accounts through the authorization code grant

pub mod error;
pub mod oauth;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use oauth::{IdentityProvider, OAuthClient, OAuthConfig, OAuthProvider, OAuthToken, TokenResponse};
