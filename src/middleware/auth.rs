use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::{CallContext, Claims};
use crate::config;
use crate::error::ApiError;

/// Bearer-token middleware.
///
/// A present-but-invalid token rejects the request outright. A missing header
/// passes through without a context so the two public bootstrap endpoints
/// keep working; protected handlers extract `CallContext` and get a 401 when
/// it is absent.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_bearer_from_headers(&headers)? {
        let claims = validate_jwt(&token).map_err(ApiError::unauthorized)?;
        request.extensions_mut().insert(CallContext::from(claims));
    }

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header, if any.
fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let auth_header = match headers.get("authorization") {
        Some(h) => h,
        None => return Ok(None),
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use Bearer token format"))?;

    if token.trim().is_empty() {
        return Err(ApiError::unauthorized("Empty bearer token"));
    }

    Ok(Some(token.to_string()))
}

/// Validate a JWT and extract its claims.
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_base64_secret(secret)
        .map_err(|_| "JWT secret is not valid base64".to_string())?;
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid bearer token: {}", e))?;

    Ok(token_data.claims)
}

/// Extractor for authenticated handlers: 401 when no valid token was presented.
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for CallContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallContext>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_yields_no_token() {
        assert!(extract_bearer_from_headers(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer_from_headers(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer_from_headers(&headers_with("Basic dXNlcjpwdw==")).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn empty_bearer_token_is_rejected() {
        let err = extract_bearer_from_headers(&headers_with("Bearer   ")).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
