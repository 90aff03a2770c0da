use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::model::{Identity, UserId};

use super::{AuthError, IdentityProvider};

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Verifies session tokens against an identity-toolkit style
/// `accounts:lookup` endpoint.
pub struct IdentityToolkit {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IdentityToolkit {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> IdentityToolkit {
        IdentityToolkit {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn lookup_url(&self) -> String {
        format!("{}/v1/accounts:lookup", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    local_id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl IdentityProvider for IdentityToolkit {
    #[instrument(skip(self, session_token))]
    async fn verify(&self, session_token: &str) -> Result<Option<Identity>, AuthError> {
        let response = self
            .client
            .post(self.lookup_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({ "idToken": session_token }))
            .send()
            .await
            .map_err(AuthError::Network)?;
        if response.status().is_client_error() {
            // the service answers 400 for expired or malformed tokens,
            // which is "not signed in" rather than a failure of ours
            let body: ErrorResponse = response.json().await.map_err(AuthError::Network)?;
            tracing::debug!(reason = %body.error.message, "token rejected");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AuthError::Service {
                message: format!("lookup returned HTTP {}", response.status()),
            });
        }
        let body: LookupResponse = response.json().await.map_err(AuthError::Network)?;
        Ok(body.users.into_iter().next().map(|user| Identity {
            id: UserId(user.local_id),
            email: user.email,
            display_name: user.display_name.filter(|name| !name.is_empty()),
        }))
    }
}
