use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use tracing::debug;

use app_core::model::Identity;

use crate::app_state::AppState;
use crate::http_error::ApiError;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the request's bearer token to an identity, once per request.
/// Every view in this application is per-user, so there is no anonymous
/// path.
pub async fn require_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Identity, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("you must be signed in".to_owned()))?;
    match state.identity.verify(token).await? {
        Some(identity) => Ok(identity),
        None => {
            debug!("session token rejected");
            Err(ApiError::Unauthorized(
                "Your session has expired. Please log in again.".to_owned(),
            ))
        }
    }
}

#[cfg(test)]
mod test {
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens() {
        assert_eq!(bearer_token(&headers_with("Bearer tok-1")), Some("tok-1"));
        assert_eq!(bearer_token(&headers_with("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
