//! Session cookie extraction.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{SessionCredentials, SESSION_COOKIE};
use crate::web::handlers::AppState;

/// Credential snapshot of the caller's session.
///
/// Never rejects: requests without a live session get an anonymous snapshot,
/// and handlers decide which platform they need.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub SessionCredentials);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let id = session_id(&CookieJar::from_headers(&parts.headers));
        Ok(CurrentSession(state.sessions.credentials(id.as_deref()).await))
    }
}

/// Session id carried by the request, whether or not it is still live.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Cookie binding the browser to session `id`.
pub fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session binding.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
