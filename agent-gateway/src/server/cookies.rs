use axum_extra::extract::cookie::Cookie;
use time::Duration;

use super::config::CookieConfiguration;

/// Create session cookie.
pub(super) fn session_cookie(
    config: &CookieConfiguration,
    session_id: &str,
    ttl_seconds: u64,
) -> Cookie<'static> {
    Cookie::build((config.name.clone(), session_id.to_string()))
        .http_only(true)
        .secure(config.secure)
        .same_site(config.same_site.into())
        .path("/")
        .max_age(Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX)))
        .build()
}

/// Create removal cookie for session.
pub(super) fn clear_session_cookie(config: &CookieConfiguration) -> Cookie<'static> {
    Cookie::build((config.name.clone(), ""))
        .secure(config.secure)
        .same_site(config.same_site.into())
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
