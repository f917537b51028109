use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ContextService, MembershipService, MessageService, SeaOrmAuthService,
    SeaOrmContextService, SeaOrmMembershipService, SeaOrmMessageService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub membership_service: Arc<dyn MembershipService>,

    pub message_service: Arc<dyn MessageService>,

    pub context_service: Arc<dyn ContextService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let config_arc = Arc::new(RwLock::new(config));

        let auth_service =
            Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService>;

        let membership_service = Arc::new(SeaOrmMembershipService::new(
            store.clone(),
            config_arc.clone(),
        )) as Arc<dyn MembershipService>;

        let message_service =
            Arc::new(SeaOrmMessageService::new(store.clone())) as Arc<dyn MessageService>;

        let context_service =
            Arc::new(SeaOrmContextService::new(store.clone())) as Arc<dyn ContextService>;

        Ok(Self {
            config: config_arc,
            store,
            auth_service,
            membership_service,
            message_service,
            context_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
