use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum::Form;
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState};
use crate::services::{AuthError, MemberInfo};
use crate::views;

/// Session key holding the identity. Only the username is ever stored;
/// the full record is re-fetched on every request.
pub(crate) const SESSION_USER_KEY: &str = "user";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Session helpers
// ============================================================================

/// Get the username from the session, if any
pub(crate) async fn session_username(session: &Session) -> Result<Option<String>, ApiError> {
    session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

/// Restore the member for the session identity. A username whose account is
/// no longer a joined member resolves to `None` (treated as unauthenticated).
pub(crate) async fn current_member(
    state: &AppState,
    session: &Session,
) -> Result<Option<MemberInfo>, ApiError> {
    let Some(username) = session_username(session).await? else {
        return Ok(None);
    };

    state
        .auth()
        .current_member(&username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))
}

/// Like [`current_member`] but failing with 401 and the given message
pub(crate) async fn require_member(
    state: &AppState,
    session: &Session,
    message: &str,
) -> Result<MemberInfo, ApiError> {
    current_member(state, session)
        .await?
        .ok_or_else(|| ApiError::unauthorized(message.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn login_form() -> Html<String> {
    Html(views::login_form(None))
}

/// POST /login
/// Authenticate and redirect to the success or failure page
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, ApiError> {
    match state.auth().login(&payload.username, &payload.password).await {
        Ok(member) => {
            session
                .insert(SESSION_USER_KEY, &member.username)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

            tracing::info!("Member logged in: {}", member.username);

            Ok(Redirect::to("/login-success").into_response())
        }
        Err(AuthError::NotAMember | AuthError::BadCredentials) => {
            Ok(Redirect::to("/login-failure").into_response())
        }
        Err(e) => Err(ApiError::DatabaseError(e.to_string())),
    }
}

/// GET /login-success
/// Homepage with a fresh context; the admin flag reflects storage at render
/// time, not login time.
pub async fn login_success(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let member = current_member(&state, &session).await?;

    let ctx = state
        .context()
        .build_context(member.as_ref().map(|m| m.username.as_str()))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Html(views::homepage(
        &ctx,
        member.as_ref(),
        Some("You successfully logged in."),
    )))
}

/// GET /login-failure
pub async fn login_failure() -> Html<String> {
    Html(views::login_form(Some(
        "Login failed. Please ensure you have signed up, joined the club, and try again.",
    )))
}

/// GET /logout
/// Clear the identity; the session row persists until natural expiry.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let _: Option<String> = session
        .remove(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    let ctx = state
        .context()
        .build_context(None)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Html(views::homepage(
        &ctx,
        None,
        Some("You successfully logged out."),
    )))
}
