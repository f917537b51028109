use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{current_member, require_member};
use super::validation::validate_signup;
use super::{ApiError, AppState};
use crate::services::{MembershipError, UserContext};
use crate::views;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub username: String,
    pub password: String,
    pub secret_passcode: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccessRequest {
    pub admin_passcode: String,
}

async fn fresh_context(
    state: &AppState,
    username: Option<&str>,
) -> Result<UserContext, ApiError> {
    state
        .context()
        .build_context(username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn homepage(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let member = current_member(&state, &session).await?;
    let ctx = fresh_context(&state, member.as_ref().map(|m| m.username.as_str())).await?;

    Ok(Html(views::homepage(&ctx, member.as_ref(), None)))
}

/// GET /sign-up
pub async fn signup_form() -> Html<String> {
    Html(views::signup_form(None))
}

/// POST /sign-up
/// Create an account, or re-render the form with a single generic message
/// when any field rule fails.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<SignupRequest>,
) -> Result<Response, ApiError> {
    let valid = match validate_signup(
        &payload.first_name,
        &payload.last_name,
        &payload.username,
        &payload.password,
        &payload.password_confirmation,
    ) {
        Ok(valid) => valid,
        Err(errors) => {
            tracing::debug!("Signup validation failed: {}", errors.join("; "));
            return Ok(Html(views::signup_form(Some(
                "Invalid value(s) in fields. Please try again.",
            )))
            .into_response());
        }
    };

    state
        .store()
        .create_member(
            &valid.first_name,
            &valid.last_name,
            &valid.username,
            &valid.password,
        )
        .await
        .map_err(|e| ApiError::DatabaseError(format!("Failed to create member: {e}")))?;

    tracing::info!("New member signed up: {}", valid.username);

    // The new account is not logged in; the context reflects whoever holds
    // the session, which on this path is usually nobody.
    let member = current_member(&state, &session).await?;
    let ctx = fresh_context(&state, member.as_ref().map(|m| m.username.as_str())).await?;

    Ok(Html(views::homepage(
        &ctx,
        member.as_ref(),
        Some("You have successfully signed up!"),
    ))
    .into_response())
}

/// GET /join
pub async fn join_form() -> Html<String> {
    Html(views::join_form(None))
}

/// POST /join
/// Flip the membership flag, or fail with 401/403/500 per failure kind
pub async fn join(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<JoinRequest>,
) -> Result<Response, ApiError> {
    match state
        .membership()
        .join(
            &payload.username,
            &payload.password,
            &payload.secret_passcode,
        )
        .await
    {
        Ok(()) => {}
        Err(MembershipError::InvalidCredentials) => {
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
        Err(MembershipError::WrongPasscode) => {
            return Err(ApiError::forbidden("Incorrect secret passcode"));
        }
        Err(MembershipError::StorageFailure) => {
            return Err(ApiError::StorageFailure(
                "Failed to update membership status".to_string(),
            ));
        }
        Err(MembershipError::Database(e)) => return Err(ApiError::DatabaseError(e)),
    }

    let member = current_member(&state, &session).await?;
    let ctx = fresh_context(&state, member.as_ref().map(|m| m.username.as_str())).await?;

    Ok(Html(views::homepage(
        &ctx,
        member.as_ref(),
        Some("You have successfully joined the club!"),
    ))
    .into_response())
}

/// GET /login-success/admin
pub async fn admin_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    require_member(&state, &session, "Please log in to request admin access.").await?;

    Ok(Html(views::admin_form(None)))
}

/// POST /login-success/admin
/// Grant admin rights to the logged-in member
pub async fn grant_admin(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<AdminAccessRequest>,
) -> Result<Response, ApiError> {
    let member =
        require_member(&state, &session, "Please log in to request admin access.").await?;

    match state
        .membership()
        .grant_admin(&member.username, &payload.admin_passcode)
        .await
    {
        Ok(()) => {}
        Err(MembershipError::WrongPasscode) => {
            return Err(ApiError::forbidden("Incorrect admin passcode"));
        }
        Err(MembershipError::InvalidCredentials | MembershipError::StorageFailure) => {
            return Err(ApiError::StorageFailure(
                "Failed to update admin status".to_string(),
            ));
        }
        Err(MembershipError::Database(e)) => return Err(ApiError::DatabaseError(e)),
    }

    // Re-fetch so the page reflects the new admin flag
    let member = current_member(&state, &session).await?;
    let ctx = fresh_context(&state, member.as_ref().map(|m| m.username.as_str())).await?;

    Ok(Html(views::homepage(
        &ctx,
        member.as_ref(),
        Some("You have successfully gained admin access!"),
    ))
    .into_response())
}
