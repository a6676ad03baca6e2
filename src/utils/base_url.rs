//! Public base URL resolution for displaying short links.

use axum::http::{HeaderMap, header};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Returns the base URL (always ending in `/`) that aliases are appended to.
///
/// A configured base wins. Otherwise the base is built from the `Host`
/// header, with the scheme taken from `X-Forwarded-Proto` when a proxy sets
/// it (`http` by default). Without a usable `Host` header the result is `/`,
/// so short links degrade to site-relative paths.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// assert_eq!(resolve_base_url(&headers, None), "http://s.example.com:8080/");
/// ```
pub fn resolve_base_url(headers: &HeaderMap, configured: Option<&str>) -> String {
    if let Some(base) = configured {
        return with_trailing_slash(base);
    }

    let Some(host) = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
    else {
        return "/".to_string();
    };

    let scheme = headers
        .get(FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".to_string());

    format!("{scheme}://{host}/")
}

/// Appends `alias` to a base URL produced by [`resolve_base_url`].
pub fn short_url(base_url: &str, alias: &str) -> String {
    format!("{}{}", with_trailing_slash(base_url), alias)
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}
