//! OAuth and session handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::CookieJar;
use tracing::{info, warn};

use crate::auth::CredentialProvider;
use crate::platform::UserProfile;
use crate::web::dto::CallbackQuery;
use crate::web::error::{ApiError, LOGIN_REQUIRED};
use crate::web::middleware::{removal_cookie, session_cookie, session_id, CurrentSession};

use super::AppState;

/// Pull the authorization code out of a callback, or explain why there is none.
fn callback_code(query: CallbackQuery) -> Result<String, ApiError> {
    match (query.code, query.error) {
        (Some(code), _) if !code.is_empty() => Ok(code),
        (_, Some(error)) => {
            warn!(error = %error, "Authorization denied");
            Err(ApiError::unauthorized(error))
        }
        _ => Err(ApiError::bad_request("Missing authorization code")),
    }
}

/// GET /user/authenticate - URL of the data-management sign-in page.
pub async fn authenticate(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    Ok(state.oauth.data_management.authorize_url()?)
}

/// GET /api/forge/callback/oauth - Finish data-management sign-in.
///
/// Stores a full-scope token for server-side calls and a public-scope token
/// for the browser, then sends the browser back to `/`.
pub async fn dm_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let code = callback_code(query)?;

    let internal = state.oauth.data_management.exchange_code(&code).await?;
    let public = state
        .oauth
        .data_management
        .refresh(&internal, &state.oauth.public_scope)
        .await?;

    let id = state
        .sessions
        .update(session_id(&jar).as_deref(), |session| {
            session.dm_internal = Some(internal);
            session.dm_public = Some(public);
        })
        .await;
    info!(session_id = %id, "Data-management sign-in completed");

    Ok((jar.add(session_cookie(id)), Redirect::to("/")))
}

/// GET /box/authenticate - URL of the Box sign-in page.
pub async fn box_authenticate(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    Ok(state.oauth.box_platform.authorize_url()?)
}

/// GET /api/box/callback/oauth - Finish Box sign-in.
pub async fn box_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let code = callback_code(query)?;
    let token = state.oauth.box_platform.exchange_code(&code).await?;

    let id = state
        .sessions
        .update(session_id(&jar).as_deref(), |session| {
            session.box_token = Some(token);
        })
        .await;
    info!(session_id = %id, "Box sign-in completed");

    Ok((jar.add(session_cookie(id)), Redirect::to("/")))
}

/// GET /user/token - Public data-management token for the viewer, or empty.
pub async fn token(CurrentSession(session): CurrentSession) -> String {
    if !session.is_authorized() {
        return String::new();
    }
    session
        .public_credentials()
        .map(|c| c.access_token().to_string())
        .unwrap_or_default()
}

/// GET /user/logoff - Drop the session.
pub async fn logoff(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, &'static str) {
    if let Some(id) = session_id(&jar) {
        state.sessions.remove(&id).await;
    }
    (jar.remove(removal_cookie()), "/")
}

/// GET /user/profile - Name and picture of the signed-in user.
pub async fn profile(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<UserProfile>, ApiError> {
    let credential = session
        .data_management_credentials()
        .ok_or_else(|| ApiError::unauthorized(LOGIN_REQUIRED))?;
    Ok(Json(state.dm.get_user_profile(&credential).await?))
}

/// GET /box/isAuthorized - `true` when the session holds a Box token.
pub async fn box_is_authorized(CurrentSession(session): CurrentSession) -> &'static str {
    if session.is_box_authorized() {
        "true"
    } else {
        "false"
    }
}
