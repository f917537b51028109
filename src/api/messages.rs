use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::require_member;
use super::validation::validate_message_id;
use super::{ApiError, AppState};
use crate::views;

#[derive(Deserialize)]
pub struct NewMessageRequest {
    pub title: String,
    pub text: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /new-message
pub async fn new_message_form(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    require_member(&state, &session, "Please log in to create a message.").await?;

    Ok(Html(views::new_message_form(None)))
}

/// POST /new-message
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<NewMessageRequest>,
) -> Result<Response, ApiError> {
    let member = require_member(&state, &session, "Please log in to create a message.").await?;

    if payload.title.trim().is_empty() || payload.text.trim().is_empty() {
        return Ok(
            Html(views::new_message_form(Some("Title and text are required."))).into_response(),
        );
    }

    state
        .messages()
        .create(&member.username, payload.title.trim(), payload.text.trim())
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let ctx = state
        .context()
        .build_context(Some(&member.username))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Html(views::homepage(
        &ctx,
        Some(&member),
        Some("You have successfully created a message!"),
    ))
    .into_response())
}

/// POST /message/{id}/delete
/// Deletion is unconditional once the caller is admin-flagged
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let member = require_member(&state, &session, "Please log in to delete messages.").await?;

    if !member.is_admin {
        return Err(ApiError::forbidden("Only admins can delete messages"));
    }

    let id = validate_message_id(id).map_err(ApiError::ValidationError)?;

    state
        .messages()
        .delete(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let ctx = state
        .context()
        .build_context(Some(&member.username))
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Html(views::homepage(
        &ctx,
        Some(&member),
        Some("You have successfully deleted a message."),
    ))
    .into_response())
}
