mod identity_toolkit;
pub use identity_toolkit::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Identity;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("could not reach the identity service")]
    Network(#[source] reqwest::Error),
    #[error("identity service error: {message}")]
    Service { message: String },
}

/// Remote auth collaborator. The core never sees credentials, only the
/// resolved identity; `Ok(None)` means "not signed in".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, session_token: &str) -> Result<Option<Identity>, AuthError>;
}
