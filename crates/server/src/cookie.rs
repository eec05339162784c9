use axum::http::{
    header::{self, InvalidHeaderValue},
    HeaderMap, HeaderValue,
};
use shared::{domain::SessionId, protocol::SESSION_COOKIE};

/// Session token from the request's `Cookie` headers, if any.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
        .map(|value| SessionId(value.to_string()))
}

pub(crate) fn session_cookie(session_id: &SessionId) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
}
