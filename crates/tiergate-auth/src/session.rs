//! Session cookies carrying the two tokens.
//!
//! Both cookies are `HttpOnly`, `SameSite=Lax`, scoped to `/`, and `Secure`
//! when the server runs behind TLS.

use axum::http::{HeaderMap, header};
use tiergate_core::{ACCESS_COOKIE_NAME, DELEGATED_COOKIE_NAME};
use tiergate_token::IssuedTokens;

/// Build a `Set-Cookie` value for a session token.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name,
        value,
        max_age_secs,
        if secure { "; Secure" } else { "" }
    )
}

/// Build a `Set-Cookie` value that clears a session token.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

/// `Set-Cookie` values for both tokens issued at login.
pub fn login_cookies(tokens: &IssuedTokens, max_age_secs: i64, secure: bool) -> [String; 2] {
    [
        session_cookie(ACCESS_COOKIE_NAME, &tokens.access, max_age_secs, secure),
        session_cookie(DELEGATED_COOKIE_NAME, &tokens.delegated, max_age_secs, secure),
    ]
}

/// `Set-Cookie` values clearing both tokens.
pub fn logout_cookies(secure: bool) -> [String; 2] {
    [
        clear_cookie(ACCESS_COOKIE_NAME, secure),
        clear_cookie(DELEGATED_COOKIE_NAME, secure),
    ]
}

/// Extract a cookie value from the request headers.
///
/// Looks through every `Cookie` header; empty values count as absent.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|value| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
