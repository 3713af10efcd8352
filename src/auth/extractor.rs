use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use tracing::debug;

use super::token::{hash_session_token, SESSION_COOKIE};
use crate::errors::ApiError;
use crate::models::Driver;
use crate::repo;
use crate::AppState;

/// The driver behind the request's session
///
/// Taking this as a handler argument makes the route require a live session;
/// requests without one are answered with `401 Unauthorized` before the
/// handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentDriver {
    pub driver: Driver,

    /// Hash of the session token the request presented
    pub session_hash: String,
}

/// Session tokens the request presents: the `sessionid` cookie first, then
/// an `Authorization: Bearer` header
fn session_tokens(headers: &HeaderMap) -> Vec<String> {
    let mut tokens = Vec::with_capacity(2);

    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty()) {
        tokens.push(cookie.value().to_string());
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty() && !tokens.contains(token));
    tokens.extend(bearer);

    tokens
}

impl FromRequestParts<AppState> for CurrentDriver {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let tokens = session_tokens(&parts.headers);
        if tokens.is_empty() {
            debug!("Request carries no session token");
            return Err(ApiError::Unauthorized);
        }

        let now = Utc::now().naive_utc();

        // A stale cookie must not hide a live bearer token
        for token in tokens {
            let session_hash = hash_session_token(&token);
            if let Some((_, driver)) = repo::find_active_session(&state.pool, &session_hash, now)? {
                return Ok(Self {
                    driver,
                    session_hash,
                });
            }
        }

        debug!("Session token is unknown or expired");
        Err(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; sessionid=abc123"));

        assert_eq!(session_tokens(&headers), vec!["abc123".to_string()]);
    }

    #[test]
    fn test_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));

        assert_eq!(session_tokens(&headers), vec!["abc123".to_string()]);
    }

    #[test]
    fn test_cookie_tried_before_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionid=from-cookie"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(
            session_tokens(&headers),
            vec!["from-cookie".to_string(), "from-header".to_string()]
        );
    }

    #[test]
    fn test_same_token_listed_once() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sessionid=abc123"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));

        assert_eq!(session_tokens(&headers), vec!["abc123".to_string()]);
    }

    #[test]
    fn test_no_token() {
        let mut headers = HeaderMap::new();
        assert!(session_tokens(&headers).is_empty());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(session_tokens(&headers).is_empty());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(session_tokens(&headers).is_empty());
    }
}
