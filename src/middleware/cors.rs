//! CORS policy for local frontends on `localhost:<4 digits>`.

use axum::http::{header, HeaderName, HeaderValue, Method};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Preflight results may be cached for 12 hours.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(43200);

pub const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::PUT, Method::POST, Method::DELETE];

pub const ALLOWED_HEADERS: [HeaderName; 5] = [
    header::ORIGIN,
    HeaderName::from_static("x-requested-with"),
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::AUTHORIZATION,
];

fn origin_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)localhost:\d{4}$").expect("static regex"))
}

pub fn origin_allowed(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|o| origin_pattern().is_match(o))
        .unwrap_or(false)
}

/// Preflight requests are answered here and never reach the auth gate.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _parts| origin_allowed(origin)))
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .max_age(PREFLIGHT_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_digit_localhost_ports_allowed() {
        assert!(origin_allowed(&HeaderValue::from_static("http://localhost:3000")));
        assert!(origin_allowed(&HeaderValue::from_static("https://LOCALHOST:8080")));
    }

    #[test]
    fn other_origins_rejected() {
        assert!(!origin_allowed(&HeaderValue::from_static("http://localhost:80")));
        assert!(!origin_allowed(&HeaderValue::from_static("http://localhost:30000")));
        assert!(!origin_allowed(&HeaderValue::from_static("http://example.com")));
        assert!(!origin_allowed(&HeaderValue::from_static("http://localhost:3000/path")));
    }
}
