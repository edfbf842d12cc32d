//! Locating the session token on an incoming request.
//!
//! Browsers send the Clerk session as the `__session` cookie; API clients
//! send `Authorization: Bearer <jwt>`. The header wins when both are present.

/// Name of the cookie Clerk stores the session JWT in.
pub const SESSION_COOKIE: &str = "__session";

/// Extract the session token from raw `Authorization` and `Cookie` header
/// values.
#[must_use]
pub fn session_token<'a>(authorization: Option<&'a str>, cookie: Option<&'a str>) -> Option<&'a str> {
    authorization
        .and_then(bearer_token)
        .or_else(|| cookie.and_then(session_cookie))
}

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn session_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
