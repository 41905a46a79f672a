use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use paddock_auth::TokenService;
use paddock_core::DomainError;
use paddock_infra::Store;

use crate::app::errors::{domain_error_to_response, json_error};
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn Store>,
}

/// Auth gate for protected routes.
///
/// Rejects with 401 before the handler runs unless the bearer token verifies
/// and its subject still exists; then attaches [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).map_err(|reason| {
        tracing::warn!(path = %req.uri().path(), reason, "request rejected: no usable bearer token");
        unauthenticated()
    })?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        tracing::warn!(path = %req.uri().path(), error = %e, "request rejected: token verification failed");
        unauthenticated()
    })?;

    let user = match state.store.find_user(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = %user_id, "request rejected: token subject no longer exists");
            return Err(unauthenticated());
        }
        Err(e) => return Err(domain_error_to_response(DomainError::from(e))),
    };

    req.extensions_mut().insert(CurrentUser::new(&user));

    Ok(next.run(req).await)
}

fn unauthenticated() -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing authorization header")?;

    let header = header.to_str().map_err(|_| "authorization header is not ascii")?;

    let header = header.strip_prefix("Bearer ").ok_or("not a bearer credential")?;

    let token = header.trim();
    if token.is_empty() {
        return Err("empty bearer token");
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::AUTHORIZATION};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn unusable_headers_are_rejected() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
        assert!(extract_bearer(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_bearer(&headers("Bearer    ")).is_err());
        assert!(extract_bearer(&headers("bearer abc")).is_err());
    }
}
