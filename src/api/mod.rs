use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use time;

use crate::config::Config;
use crate::db::Store;
use crate::state::SharedState;

pub mod auth;
mod error;
pub mod members;
pub mod messages;
mod validation;

pub use error::ApiError;

use tokio::sync::RwLock;

use crate::services::{AuthService, ContextService, MembershipService, MessageService};

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn membership(&self) -> &Arc<dyn MembershipService> {
        &self.shared.membership_service
    }

    #[must_use]
    pub fn messages(&self) -> &Arc<dyn MessageService> {
        &self.shared.message_service
    }

    #[must_use]
    pub fn context(&self) -> &Arc<dyn ContextService> {
        &self.shared.context_service
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState { shared })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let (secure_cookies, session_secret) = {
        let config = state.config().read().await;
        (
            config.server.secure_cookies,
            config.club.session_secret.clone(),
        )
    };

    // The session table lives next to the member data, sharing the pool
    let session_store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)))
        .with_signed(Key::from(session_secret.as_bytes()));

    let router = Router::new()
        .route("/", get(members::homepage))
        .route("/sign-up", get(members::signup_form).post(members::signup))
        .route("/join", get(members::join_form).post(members::join))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/login-success", get(auth::login_success))
        .route("/login-failure", get(auth::login_failure))
        .route("/logout", get(auth::logout))
        .route(
            "/login-success/admin",
            get(members::admin_form).post(members::grant_admin),
        )
        .route(
            "/new-message",
            get(messages::new_message_form).post(messages::create_message),
        )
        .route("/message/{id}/delete", post(messages::delete_message))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}
