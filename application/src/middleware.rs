//! HTTP middleware of the application.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse as _, Response},
};
use http::{header, HeaderValue, Method};
use url::Url;

use crate::{define_error, Error};

/// Content-Security-Policy applied to every response.
const CONTENT_SECURITY_POLICY: &str = "\
    default-src 'self'; \
    script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    font-src 'self' https://fonts.gstatic.com; \
    img-src 'self' data: blob: https:; \
    connect-src 'self' https://*.supabase.co; \
    frame-ancestors 'none'; \
    base-uri 'self'; \
    form-action 'self'";

/// Injects the static set of security headers into every response.
///
/// Applied outermost, so even rejections produced by other layers carry
/// the headers.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    drop(headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ));
    drop(headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
    ));
    drop(headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    ));
    drop(headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    ));
    drop(headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static(
            "camera=(), microphone=(), geolocation=()",
        ),
    ));
    drop(headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    ));

    response
}

/// Rejects cross-origin mutating requests.
///
/// Compares the authority of the `Origin` header against the `Host`
/// header on `POST`/`PUT`/`PATCH`/`DELETE`. When either header is absent
/// the request passes: non-browser clients send no `Origin` at all, and
/// the session cookie's `SameSite` attribute still applies in browsers.
pub async fn origin_gate(request: Request, next: Next) -> Response {
    const MUTATING: [Method; 4] =
        [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if MUTATING.contains(request.method()) {
        let headers = request.headers();
        let origin = headers
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok());
        let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());

        if let (Some(origin), Some(host)) = (origin, host) {
            match origin_authority(origin) {
                Some(authority) if authority == host => {}
                Some(_) => {
                    return Error::from(OriginError::CrossOrigin)
                        .into_response();
                }
                None => {
                    return Error::from(OriginError::MalformedOrigin)
                        .into_response();
                }
            }
        }
    }

    next.run(request).await
}

/// Extracts the `host[:port]` authority out of an `Origin` header value.
///
/// [`None`] is returned for unparseable or host-less origins.
fn origin_authority(origin: &str) -> Option<String> {
    let url = Url::parse(origin).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

define_error! {
    enum OriginError {
        #[code = "CROSS_ORIGIN"]
        #[status = FORBIDDEN]
        #[message = "Cross-origin request rejected"]
        CrossOrigin,

        #[code = "MALFORMED_ORIGIN"]
        #[status = FORBIDDEN]
        #[message = "Malformed Origin header"]
        MalformedOrigin,
    }
}

#[cfg(test)]
mod origin_authority_spec {
    use super::origin_authority;

    #[test]
    fn keeps_explicit_ports_and_drops_default_ones() {
        assert_eq!(
            origin_authority("http://localhost:3000").as_deref(),
            Some("localhost:3000"),
        );
        assert_eq!(
            origin_authority("https://app.example.com").as_deref(),
            Some("app.example.com"),
        );
    }

    #[test]
    fn rejects_garbage_and_host_less_origins() {
        assert_eq!(origin_authority("not a url"), None);
        assert_eq!(origin_authority("null"), None);
        assert_eq!(origin_authority("file:///etc/passwd"), None);
    }
}
