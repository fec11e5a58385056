//! Bearer gate: every request must carry an `Authorization` header starting with `Bearer`.
//! Only the prefix is checked; the token itself is not verified.

use crate::error::AppError;
use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

pub const BEARER_PREFIX: &str = "Bearer";

pub fn check_authorization(headers: &HeaderMap) -> Result<(), AppError> {
    let value = headers.get(header::AUTHORIZATION).ok_or(AppError::Unauthorized)?;
    if value.as_bytes().starts_with(BEARER_PREFIX.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

pub async fn require_bearer(request: Request, next: Next) -> Result<Response, AppError> {
    check_authorization(request.headers())?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn missing_header_rejected() {
        assert!(matches!(check_authorization(&HeaderMap::new()), Err(AppError::Unauthorized)));
    }

    #[test]
    fn wrong_scheme_rejected() {
        assert!(check_authorization(&with_auth("Basic dXNlcjpwYXNz")).is_err());
        assert!(check_authorization(&with_auth("bearer abc")).is_err());
        assert!(check_authorization(&with_auth("")).is_err());
    }

    #[test]
    fn bearer_prefix_accepted() {
        assert!(check_authorization(&with_auth("Bearer abc")).is_ok());
        assert!(check_authorization(&with_auth("Bearer")).is_ok());
        assert!(check_authorization(&with_auth("BearerXYZ")).is_ok());
    }
}
