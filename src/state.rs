use std::sync::Arc;

use sqlx::PgPool;

use crate::account::repo::{AccountRepo, PgAccountRepo};
use crate::auth::SessionService;
use crate::comments::repo::{CommentRepo, PgCommentRepo};
use crate::config::AppConfig;
use crate::db;
use crate::inventory::repo::{InventoryRepo, PgInventoryRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionService>,
    pub accounts: Arc<dyn AccountRepo>,
    pub inventory: Arc<dyn InventoryRepo>,
    pub comments: Arc<dyn CommentRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;
        Ok(Self::with_pool(config, pool))
    }

    pub fn with_pool(config: Arc<AppConfig>, pool: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgAccountRepo::new(pool.clone())),
            Arc::new(PgInventoryRepo::new(pool.clone())),
            Arc::new(PgCommentRepo::new(pool)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountRepo>,
        inventory: Arc<dyn InventoryRepo>,
        comments: Arc<dyn CommentRepo>,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(&config.jwt));
        Self {
            config,
            sessions,
            accounts,
            inventory,
            comments,
        }
    }
}
